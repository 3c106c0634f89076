use serde::{Deserialize, Serialize};

/// One recorded reduction step of an abstract-machine program.
///
/// Frames are produced exclusively by the execution engine and are immutable
/// once fetched; the TUI never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Text rendering of the expression under reduction
    pub term: String,
    /// Evaluation-stack labels, outermost first
    pub context: Vec<String>,
    /// Bindings visible at this step, in visibility order (names may repeat)
    pub env: Vec<EnvVar>,
    /// Cumulative resource counters plus deltas versus the previous frame
    pub budget: ExBudget,
    /// Text of a produced result; absent when the step is not a completed
    /// reduction
    pub ret_value: Option<String>,
    /// Opaque `file:line:column` source mapping, absent when none exists
    pub location: Option<String>,
}

impl Frame {
    /// Whether this frame represents a completed reduction with a value
    pub fn has_return_value(&self) -> bool {
        self.ret_value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// A single environment binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Binding name
    pub name: String,
    /// Text rendering of the bound value
    pub value: String,
}

/// Resource consumption attached to a frame.
///
/// The engine computes the deltas; at index 0 both diffs are 0 by definition
/// since no frame precedes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExBudget {
    /// Cumulative computation steps
    pub steps: i64,
    /// Cumulative memory units
    pub mem: i64,
    /// Steps spent by this frame alone
    pub steps_diff: i64,
    /// Memory claimed by this frame alone
    pub mem_diff: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_wire_format() {
        let json = r#"{
            "term": "(force (delay x))",
            "context": ["Force", "Root"],
            "env": [{"name": "i_1", "value": "(con integer 5)"}],
            "budget": {"steps": 200, "mem": 32, "stepsDiff": 100, "memDiff": 0},
            "retValue": null,
            "location": "lib/fib.ak:4:12"
        }"#;

        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.context.len(), 2);
        assert_eq!(frame.env[0].name, "i_1");
        assert_eq!(frame.budget.steps_diff, 100);
        assert!(!frame.has_return_value());
        assert_eq!(frame.location.as_deref(), Some("lib/fib.ak:4:12"));
    }

    #[test]
    fn test_empty_return_value_is_not_a_return() {
        let frame = Frame {
            term: "x".into(),
            context: vec![],
            env: vec![],
            budget: ExBudget::default(),
            ret_value: Some(String::new()),
            location: None,
        };
        assert!(!frame.has_return_value());
    }
}
