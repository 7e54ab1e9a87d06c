use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{DebateCreatedEvent, DebateFinishedEvent, EventHandler, EventProducer, Handler, MatchFoundEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub debate_created_producer: Vec<EventProducer<DebateCreatedEvent>>,
    pub match_found_producer: Vec<EventProducer<MatchFoundEvent>>,
    pub debate_finished_producer: Vec<EventProducer<DebateFinishedEvent>>,
}

pub struct EventHandlers {
    pub on_debate_created: Option<EventHandler<DebateCreatedEvent>>,
    pub on_match_found: Option<EventHandler<MatchFoundEvent>>,
    pub on_debate_finished: Option<EventHandler<DebateFinishedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_debate_created = hooks.on_debate_created.map(|f| EventHandler::new(buffer_size, f));
        let on_match_found = hooks.on_match_found.map(|f| EventHandler::new(buffer_size, f));
        let on_debate_finished = hooks.on_debate_finished.map(|f| EventHandler::new(buffer_size, f));
        Self { on_debate_created, on_match_found, on_debate_finished }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_debate_created {
            result.debate_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_match_found {
            result.match_found_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_debate_finished {
            result.debate_finished_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_debate_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_match_found {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_debate_finished {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_debate_created: Option<Handler<DebateCreatedEvent>>,
    pub on_match_found: Option<Handler<MatchFoundEvent>>,
    pub on_debate_finished: Option<Handler<DebateFinishedEvent>>,
}

impl EventHooks {
    pub fn on_debate_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DebateCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_debate_created = Some(Arc::new(f));
        self
    }

    pub fn on_match_found<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MatchFoundEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_match_found = Some(Arc::new(f));
        self
    }

    pub fn on_debate_finished<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DebateFinishedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_debate_finished = Some(Arc::new(f));
        self
    }
}
