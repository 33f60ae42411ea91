//! Keyword-based skill routing.

use crate::Error;
use crate::profile::InstructionProfile;

/// A routable skill: a label, the profile to use, and the keywords that
/// select it.
#[derive(Clone, Debug)]
pub struct Skill {
    label: String,
    profile: InstructionProfile,
    triggers: Vec<String>,
}

impl Skill {
    /// Returns the label of the skill.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the profile used when this skill is selected.
    #[inline]
    pub fn profile(&self) -> &InstructionProfile {
        &self.profile
    }

    /// Returns the lowercased trigger keywords.
    #[inline]
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    #[inline]
    fn matches(&self, lowered_text: &str) -> bool {
        self.triggers.iter().any(|t| lowered_text.contains(t.as_str()))
    }
}

/// Selects an [`InstructionProfile`] for a message by looking for trigger
/// keywords in it.
///
/// Matching is a case-insensitive substring search. Skills are checked in
/// registration order and the first match wins, so when the trigger sets
/// of two skills overlap, the one registered earlier takes the message.
///
/// The router only looks at the current message, never at the earlier
/// conversation.
#[derive(Clone, Debug, Default)]
pub struct SkillRouter {
    skills: Vec<Skill>,
}

impl SkillRouter {
    /// Creates an empty router.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a skill.
    ///
    /// Triggers are lowercased, and empty triggers are ignored since they
    /// would match every message. Fails with [`Error::DuplicateSkill`] if
    /// the label is already taken.
    pub fn register<L, I>(
        &mut self,
        label: L,
        profile: InstructionProfile,
        triggers: I,
    ) -> Result<(), Error>
    where
        L: Into<String>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let label = label.into();
        if self.skills.iter().any(|s| s.label == label) {
            return Err(Error::DuplicateSkill(label));
        }

        let triggers: Vec<_> = triggers
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if triggers.is_empty() {
            warn!("skill `{label}` has no triggers and will never be routed");
        }
        trace!("registered skill `{label}` with triggers {triggers:?}");

        self.skills.push(Skill {
            label,
            profile,
            triggers,
        });
        Ok(())
    }

    /// Returns the label of the first skill whose triggers appear in
    /// `user_text`, or `None` if no skill matches.
    #[inline]
    pub fn route(&self, user_text: &str) -> Option<&str> {
        self.route_skill(user_text).map(Skill::label)
    }

    pub(crate) fn route_skill(&self, user_text: &str) -> Option<&Skill> {
        let lowered = user_text.to_lowercase();
        self.skills.iter().find(|s| s.matches(&lowered))
    }

    /// Returns the profile registered under `label`.
    pub fn profile(&self, label: &str) -> Option<&InstructionProfile> {
        self.skills
            .iter()
            .find(|s| s.label == label)
            .map(Skill::profile)
    }

    /// Iterates over the registered skills in registration order.
    #[inline]
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    /// Iterates over the registered labels in registration order.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(Skill::label)
    }

    /// Returns the number of registered skills.
    #[inline]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Returns `true` if no skill is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> InstructionProfile {
        InstructionProfile::new(name, format!("You are the {name} expert."))
    }

    fn pm_router() -> SkillRouter {
        let mut router = SkillRouter::new();
        router
            .register("agenda", profile("agenda"), ["agenda"])
            .unwrap();
        router
            .register("summarize", profile("summarize"), ["summarize", "notes"])
            .unwrap();
        router.register("email", profile("email"), ["email"]).unwrap();
        router
            .register("risk", profile("risk"), ["risk", "concern"])
            .unwrap();
        router
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut router = SkillRouter::new();
        router.register("A", profile("a"), ["agenda"]).unwrap();
        router.register("B", profile("b"), ["agenda", "plan"]).unwrap();

        assert_eq!(router.route("please make an agenda"), Some("A"));
        assert_eq!(router.route("let's plan the week"), Some("B"));
    }

    #[test]
    fn test_no_match() {
        let router = pm_router();
        assert_eq!(router.route("hello there"), None);
        assert_eq!(router.route(""), None);
    }

    #[test]
    fn test_case_insensitive() {
        let router = pm_router();
        assert_eq!(router.route("Draft an EMAIL to the team"), Some("email"));
        assert_eq!(router.route("Any RISKS you see?"), Some("risk"));
        assert_eq!(router.route("Here are my Notes"), Some("summarize"));
    }

    #[test]
    fn test_triggers_are_normalized() {
        let mut router = SkillRouter::new();
        router
            .register("agenda", profile("agenda"), ["  Agenda ", "", "   "])
            .unwrap();
        assert_eq!(router.skills().next().unwrap().triggers(), ["agenda"]);
        assert_eq!(router.route("anything at all"), None);
    }

    #[test]
    fn test_duplicate_label() {
        let mut router = pm_router();
        let err = router
            .register("email", profile("email"), ["mail"])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSkill(label) if label == "email"));
        assert_eq!(router.len(), 4);
        // The original registration is untouched.
        assert_eq!(router.route("mail me"), None);
    }

    #[test]
    fn test_lookup() {
        let router = pm_router();
        assert_eq!(
            router.labels().collect::<Vec<_>>(),
            ["agenda", "summarize", "email", "risk"]
        );
        assert_eq!(router.profile("risk").unwrap().name(), "risk");
        assert!(router.profile("priority").is_none());
        assert!(!router.is_empty());
    }
}
