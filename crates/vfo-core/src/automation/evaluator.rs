//! Rule matching.

use super::model::{AutomationAction, AutomationEvent, AutomationRule, TransitionContext};

/// Every rule matching `event` and `ctx`, in stored order.
///
/// All matching rules fire; there is no priority and no short-circuit.
pub fn matching_rules<'a>(
    rules: &'a [AutomationRule],
    event: &AutomationEvent,
    ctx: &TransitionContext,
) -> Vec<&'a AutomationRule> {
    rules.iter().filter(|r| r.matches(event, ctx)).collect()
}

/// The actions of every matching rule, flattened in rule order then action
/// order.
pub fn evaluate(
    rules: &[AutomationRule],
    event: &AutomationEvent,
    ctx: &TransitionContext,
) -> Vec<AutomationAction> {
    matching_rules(rules, event, ctx)
        .into_iter()
        .flat_map(|r| r.actions.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_keeps_insertion_order() {
        let rules = vec![
            AutomationRule::new("r1", "first", AutomationEvent::StageChange)
                .with_condition("stage_from", "Signed")
                .with_condition("stage_to", "Signed")
                .with_action(AutomationAction::log("one")),
            AutomationRule::new("r2", "other event", AutomationEvent::DailyCheck)
                .with_action(AutomationAction::log("never")),
            AutomationRule::new("r3", "second", AutomationEvent::StageChange)
                .with_condition("stage_to", "Signed")
                .with_action(AutomationAction::log("two"))
                .with_action(AutomationAction::log("three")),
        ];
        let ctx = TransitionContext::stage_change("b1", "Signed", "Signed", "");

        let ids: Vec<&str> = matching_rules(&rules, &AutomationEvent::StageChange, &ctx)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r3"]);

        let actions = evaluate(&rules, &AutomationEvent::StageChange, &ctx);
        assert_eq!(
            actions,
            vec![
                AutomationAction::log("one"),
                AutomationAction::log("two"),
                AutomationAction::log("three"),
            ]
        );
    }

    #[test]
    fn test_pkg_condition() {
        let rules = vec![
            AutomationRule::new("r1", "wydapt only", AutomationEvent::StageChange)
                .with_condition("pkg", "wy-apt-assess")
                .with_action(AutomationAction::log("matched")),
        ];
        let hit = TransitionContext::stage_change("b1", "New", "Paid", "wy-apt-assess");
        let miss = TransitionContext::stage_change("b2", "New", "Paid", "consult-30");
        assert_eq!(evaluate(&rules, &AutomationEvent::StageChange, &hit).len(), 1);
        assert!(evaluate(&rules, &AutomationEvent::StageChange, &miss).is_empty());
    }
}
