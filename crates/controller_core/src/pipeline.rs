use std::{collections::HashMap, rc::Rc};

use shared::{
    domain::{Event, EventType, Phase},
    naming::method_name,
};
use store::{Action, Reducer};

use crate::{
    controller::Controller,
    handlers::{ApplyFn, EffectFn, EmitFn},
    propagation::HandlerTable,
};

/// First match in declaration order with an apply function wins.
pub struct RootTransition<S, P> {
    entries: Vec<(EventType, Option<ApplyFn<S, P>>)>,
}

impl<S: 'static, P: 'static> RootTransition<S, P> {
    pub fn from_table(event_types: &[EventType], table: &HandlerTable<S, P>) -> Self {
        let entries = event_types
            .iter()
            .map(|event_type| {
                let apply = table
                    .handlers(event_type)
                    .and_then(|handlers| handlers.apply.clone());
                (event_type.clone(), apply)
            })
            .collect();
        Self { entries }
    }

    pub fn apply(&self, state: Rc<S>, event: &Event<P>) -> Rc<S> {
        for (event_type, apply) in &self.entries {
            if event_type != event.event_type() {
                continue;
            }
            if let Some(apply) = apply {
                // Only the payload reaches the apply function; the type stays
                // on the event.
                return Rc::new(apply(&state, event.data()));
            }
        }
        state
    }

    pub fn into_reducer(self) -> Reducer<S, P> {
        Box::new(move |state: Rc<S>, event: &Event<P>| self.apply(state, event))
    }
}

pub struct Stage<S, P> {
    event_type: EventType,
    emit: EmitFn<S, P>,
    explicit_emit: bool,
    effect: Option<EffectFn<S, P>>,
    apply: Option<ApplyFn<S, P>>,
}

impl<S, P> Stage<S, P> {
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn has_explicit_emit(&self) -> bool {
        self.explicit_emit
    }

    pub fn has_effect(&self) -> bool {
        self.effect.is_some()
    }

    pub fn has_apply(&self) -> bool {
        self.apply.is_some()
    }

    fn method_names(&self) -> impl Iterator<Item = String> + '_ {
        let present = [true, self.has_effect(), self.has_apply()];
        Phase::ALL
            .into_iter()
            .zip(present)
            .filter(|(_, present)| *present)
            .map(move |(phase, _)| method_name(phase, &self.event_type))
    }
}

fn identity_emit<S: 'static, P: 'static>() -> EmitFn<S, P> {
    Rc::new(|_: &Controller<S, P>, data: P| data)
}

impl<S: 'static, P: 'static> Stage<S, P> {
    pub(crate) fn fire(&self, controller: &Controller<S, P>, payload: P) {
        let data = (self.emit)(controller, payload);
        let event = Rc::new(Event::new(self.event_type.clone(), data));
        controller.store().dispatch(Action::Event(Rc::clone(&event)));
        if let Some(effect) = &self.effect {
            effect(controller, event.data());
        }
    }
}

pub struct Pipeline<S, P> {
    stages: Vec<Stage<S, P>>,
    index: HashMap<EventType, usize>,
}

impl<S: 'static, P: 'static> Pipeline<S, P> {
    pub fn synthesize(event_types: &[EventType], table: &HandlerTable<S, P>) -> Self {
        let mut stages = Vec::with_capacity(event_types.len());
        let mut index = HashMap::new();

        for event_type in event_types {
            let handlers = table.handlers(event_type);
            let explicit = handlers.and_then(|handlers| handlers.emit.clone());
            let explicit_emit = explicit.is_some();
            let emit = explicit.unwrap_or_else(identity_emit);

            index.entry(event_type.clone()).or_insert(stages.len());
            stages.push(Stage {
                event_type: event_type.clone(),
                emit,
                explicit_emit,
                effect: handlers.and_then(|handlers| handlers.effect.clone()),
                apply: handlers.and_then(|handlers| handlers.apply.clone()),
            });
        }

        Self { stages, index }
    }
}

impl<S, P> Pipeline<S, P> {
    pub fn stage(&self, event_type: &str) -> Option<&Stage<S, P>> {
        self.index.get(event_type).map(|position| &self.stages[*position])
    }

    pub fn stages(&self) -> &[Stage<S, P>] {
        &self.stages
    }

    pub fn method_names(&self) -> Vec<String> {
        self.stages.iter().flat_map(Stage::method_names).collect()
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
