//! Pipeline actions and the set-once selector
//!
//! A run performs exactly one action. The selector records it and refuses
//! to change it afterwards unless the caller asks for an override.

use crate::{GroupScope, Result, SelectionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Train,
    Generate,
    Convert,
    Evaluate,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Train,
        Action::Generate,
        Action::Convert,
        Action::Evaluate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Train => "train",
            Action::Generate => "generate",
            Action::Convert => "convert",
            Action::Evaluate => "evaluate",
        }
    }

    /// Phase groups a front-end command for this action exposes.
    pub fn option_scopes(&self) -> Vec<GroupScope> {
        match self {
            Action::Train => vec![GroupScope::General, GroupScope::Training, GroupScope::Data],
            Action::Generate => vec![GroupScope::General, GroupScope::Data],
            Action::Evaluate => vec![
                GroupScope::General,
                GroupScope::Data,
                GroupScope::Evaluation,
            ],
            Action::Convert => vec![GroupScope::General, GroupScope::Conversion],
        }
    }

    fn allowed() -> Vec<String> {
        Self::ALL.iter().map(|a| a.as_str().to_string()).collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = SelectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SelectionError::InvalidAction {
                name: s.to_string(),
                allowed: Self::allowed(),
            })
    }
}

/// Holds the action of the current run.
#[derive(Debug, Clone, Default)]
pub struct ActionSelector {
    current: Option<Action>,
}

impl ActionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as the action.
    ///
    /// Fails if an action is already recorded and `allow_override` is false,
    /// or if `name` is not a known action.
    pub fn select(&mut self, name: &str, allow_override: bool) -> Result<Action> {
        if let (Some(current), false) = (self.current, allow_override) {
            return Err(SelectionError::ActionAlreadySet {
                current: current.to_string(),
                requested: name.to_string(),
            }
            .into());
        }
        let action: Action = name.parse()?;
        self.current = Some(action);
        Ok(action)
    }

    pub fn current(&self) -> Option<Action> {
        self.current
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}
