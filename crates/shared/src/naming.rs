use crate::domain::{EventType, Phase};

pub fn to_pascal(identifier: &str) -> String {
    identifier
        .to_lowercase()
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn method_name(phase: Phase, event_type: &EventType) -> String {
    format!("{}{}", phase.prefix(), to_pascal(event_type.as_str()))
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
