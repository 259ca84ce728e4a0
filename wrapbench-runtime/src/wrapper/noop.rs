use super::Wrapper;
use super::WrapperState;
use crate::action::Decision;
use crate::registry::WrapperKind;

/// Baseline: no safety check, every output is allowed unchanged.
#[derive(Debug, Clone, Default)]
pub struct NoopWrapper;

impl Wrapper for NoopWrapper {
    fn kind(&self) -> WrapperKind {
        WrapperKind::Noop
    }

    fn reset(&mut self) {}

    fn step(&mut self, _prompt: &str, model_output: &str, _call_index: u32) -> Decision {
        Decision::allow(model_output)
    }

    fn state(&self) -> WrapperState {
        WrapperState::Stateless {
            kind: "stateless".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn always_allows_unchanged() {
        let mut wrapper = NoopWrapper;
        for (i, out) in ["", "  padded  ", "anything"].into_iter().enumerate() {
            let decision = wrapper.step("prompt", out, i as u32);
            assert_eq!(decision.action, Action::Allow);
            assert_eq!(decision.output, out);
        }
    }
}
