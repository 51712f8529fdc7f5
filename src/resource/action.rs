use reqwest::Method;
use std::collections::BTreeMap;

/// One request shape a resource can issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub method: Method,
    pub is_array: bool,
}

impl Action {
    pub fn new(method: Method) -> Self {
        Action {
            method,
            is_array: false,
        }
    }

    pub fn array(method: Method) -> Self {
        Action {
            method,
            is_array: true,
        }
    }

    /// Only POST, PUT and PATCH send the payload as the request body.
    pub fn has_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT || self.method == Method::PATCH
    }
}

pub type Actions = BTreeMap<String, Action>;

pub fn default_actions() -> Actions {
    BTreeMap::from([
        ("get".to_string(), Action::new(Method::GET)),
        ("save".to_string(), Action::new(Method::POST)),
        ("query".to_string(), Action::array(Method::GET)),
        ("remove".to_string(), Action::new(Method::DELETE)),
        ("delete".to_string(), Action::new(Method::DELETE)),
    ])
}

/// Custom actions win over defaults with the same name.
pub fn merge_actions(custom_actions: Actions) -> Actions {
    let mut actions = default_actions();
    actions.extend(custom_actions);
    actions
}
