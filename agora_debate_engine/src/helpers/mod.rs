mod match_key;

pub use match_key::matchmaking_key;
