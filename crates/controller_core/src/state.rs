use std::{collections::BTreeMap, fmt, rc::Rc};

use serde_json::{Map, Value};

pub const INDEX_KEY: &str = "index";

pub type ComputedFn = Rc<dyn Fn(&DynamicState) -> Value>;

#[derive(Clone)]
pub enum StateValue {
    Data(Value),
    Function(ComputedFn),
}

impl StateValue {
    pub fn is_function(&self) -> bool {
        matches!(self, StateValue::Function(_))
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Data(value) => write!(f, "{value}"),
            StateValue::Function(_) => f.write_str("<function>"),
        }
    }
}

#[derive(Clone, Default)]
pub struct DynamicState {
    properties: BTreeMap<String, StateValue>,
}

impl DynamicState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_function(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&DynamicState) -> Value + 'static,
    ) -> Self {
        self.set_function(key, f);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties
            .insert(key.into(), StateValue::Data(value.into()));
        self
    }

    pub fn set_function(
        &mut self,
        key: impl Into<String>,
        f: impl Fn(&DynamicState) -> Value + 'static,
    ) -> &mut Self {
        self.properties
            .insert(key.into(), StateValue::Function(Rc::new(f)));
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.properties.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.properties.get(key)? {
            StateValue::Data(value) => Some(value),
            StateValue::Function(_) => None,
        }
    }

    pub fn call(&self, key: &str) -> Option<Value> {
        match self.properties.get(key)? {
            StateValue::Function(f) => Some(f(self)),
            StateValue::Data(_) => None,
        }
    }

    pub fn index(&self) -> Option<&StateValue> {
        self.properties.get(INDEX_KEY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .properties
            .iter()
            .filter_map(|(key, value)| match value {
                StateValue::Data(value) => Some((key.clone(), value.clone())),
                StateValue::Function(_) => None,
            })
            .collect();
        Value::Object(map)
    }

    /// Copies every non-function property of `self` over `target`, then
    /// copies `index` as-is.
    pub fn clone_onto(&self, mut target: DynamicState) -> DynamicState {
        for (key, value) in &self.properties {
            if !value.is_function() {
                target.properties.insert(key.clone(), value.clone());
            }
        }
        if let Some(index) = self.index() {
            target
                .properties
                .insert(INDEX_KEY.to_string(), index.clone());
        }
        target
    }

    pub fn clone_state(&self) -> DynamicState {
        self.clone_onto(DynamicState::new())
    }
}

impl fmt::Debug for DynamicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.properties.iter()).finish()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
