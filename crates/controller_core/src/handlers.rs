use std::{fmt, rc::Rc};

use shared::domain::{EventType, Phase};

use crate::controller::Controller;

pub type EmitFn<S, P> = Rc<dyn Fn(&Controller<S, P>, P) -> P>;
pub type EffectFn<S, P> = Rc<dyn Fn(&Controller<S, P>, &P)>;
pub type ApplyFn<S, P> = Rc<dyn Fn(&S, &P) -> S>;

pub enum Slot<S, P> {
    Emit(EmitFn<S, P>),
    Effect(EffectFn<S, P>),
    Apply(ApplyFn<S, P>),
}

impl<S, P> Slot<S, P> {
    pub fn phase(&self) -> Phase {
        match self {
            Slot::Emit(_) => Phase::Emit,
            Slot::Effect(_) => Phase::Effect,
            Slot::Apply(_) => Phase::Apply,
        }
    }
}

impl<S, P> Clone for Slot<S, P> {
    fn clone(&self) -> Self {
        match self {
            Slot::Emit(f) => Slot::Emit(Rc::clone(f)),
            Slot::Effect(f) => Slot::Effect(Rc::clone(f)),
            Slot::Apply(f) => Slot::Apply(Rc::clone(f)),
        }
    }
}

pub struct Handlers<S, P> {
    pub emit: Option<EmitFn<S, P>>,
    pub effect: Option<EffectFn<S, P>>,
    pub apply: Option<ApplyFn<S, P>>,
}

impl<S, P> Handlers<S, P> {
    pub fn slot(&self, phase: Phase) -> Option<Slot<S, P>> {
        match phase {
            Phase::Emit => self.emit.clone().map(Slot::Emit),
            Phase::Effect => self.effect.clone().map(Slot::Effect),
            Phase::Apply => self.apply.clone().map(Slot::Apply),
        }
    }

    pub fn set(&mut self, slot: Slot<S, P>) {
        match slot {
            Slot::Emit(f) => self.emit = Some(f),
            Slot::Effect(f) => self.effect = Some(f),
            Slot::Apply(f) => self.apply = Some(f),
        }
    }
}

impl<S, P> Default for Handlers<S, P> {
    fn default() -> Self {
        Self {
            emit: None,
            effect: None,
            apply: None,
        }
    }
}

impl<S, P> Clone for Handlers<S, P> {
    fn clone(&self) -> Self {
        Self {
            emit: self.emit.clone(),
            effect: self.effect.clone(),
            apply: self.apply.clone(),
        }
    }
}

impl<S, P> fmt::Debug for Handlers<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("emit", &self.emit.is_some())
            .field("effect", &self.effect.is_some())
            .field("apply", &self.apply.is_some())
            .finish()
    }
}

pub struct HandlerSet<S, P> {
    entries: Vec<(EventType, Handlers<S, P>)>,
}

impl<S: 'static, P: 'static> HandlerSet<S, P> {
    pub fn emit(
        mut self,
        event_type: impl Into<EventType>,
        f: impl Fn(&Controller<S, P>, P) -> P + 'static,
    ) -> Self {
        self.insert(event_type.into(), Slot::Emit(Rc::new(f)));
        self
    }

    pub fn effect(
        mut self,
        event_type: impl Into<EventType>,
        f: impl Fn(&Controller<S, P>, &P) + 'static,
    ) -> Self {
        self.insert(event_type.into(), Slot::Effect(Rc::new(f)));
        self
    }

    pub fn apply(mut self, event_type: impl Into<EventType>, f: impl Fn(&S, &P) -> S + 'static) -> Self {
        self.insert(event_type.into(), Slot::Apply(Rc::new(f)));
        self
    }
}

impl<S, P> HandlerSet<S, P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, event_type: EventType, slot: Slot<S, P>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == event_type) {
            Some((_, handlers)) => handlers.set(slot),
            None => {
                let mut handlers = Handlers::default();
                handlers.set(slot);
                self.entries.push((event_type, handlers));
            }
        }
    }

    pub fn get(&self, event_type: &EventType) -> Option<&Handlers<S, P>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == event_type)
            .map(|(_, handlers)| handlers)
    }

    pub fn event_types(&self) -> impl Iterator<Item = &EventType> {
        self.entries.iter().map(|(event_type, _)| event_type)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: HandlerSet<S, P>) {
        for (event_type, handlers) in other.entries {
            for phase in Phase::ALL {
                if let Some(slot) = handlers.slot(phase) {
                    self.insert(event_type.clone(), slot);
                }
            }
        }
    }
}

impl<S, P> Default for HandlerSet<S, P> {
    fn default() -> Self {
        Self::new()
    }
}
