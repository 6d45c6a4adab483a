//! Startup classification and non-blocking process launch (spec.md §4.10,
//! §C "layoutmenu"/"autostart").
use crate::{geometry::Rect, tagset::TagMask};
use std::process::{Command, Stdio};

/// One configured rule, matched in order against a newly managed client's
/// class/instance/title (spec.md §4.10).
#[derive(Debug, Clone, Default)]
pub struct Rule {
    /// Empty means "match anything" for that field, same convention as the
    /// swallow engine's filters.
    pub class: String,
    pub instance: String,
    pub title: String,

    pub tags: TagMask,
    pub floating: bool,
    pub monitor: Option<usize>,
    pub float_rect: Option<Rect>,
    pub fake_fullscreen: bool,
}

impl Rule {
    fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        (self.class.is_empty() || class.contains(&self.class))
            && (self.instance.is_empty() || instance.contains(&self.instance))
            && (self.title.is_empty() || title.contains(&self.title))
    }
}

/// The outcome of running the rule table against one client (spec.md §4.10:
/// "assigns tag mask (OR-ed), floating flag, monitor override, initial float
/// geometry, and fake-fullscreen flag").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMatch {
    pub tags: TagMask,
    pub floating: bool,
    pub monitor: Option<usize>,
    pub float_rect: Option<Rect>,
    pub fake_fullscreen: bool,
}

/// Fold every matching rule's contributions together; a later rule's
/// `monitor`/`float_rect` override an earlier one's, but tag masks
/// accumulate via bitwise OR.
pub fn apply_rules(rules: &[Rule], class: &str, instance: &str, title: &str) -> RuleMatch {
    let mut out = RuleMatch::default();
    for rule in rules.iter().filter(|r| r.matches(class, instance, title)) {
        out.tags |= rule.tags;
        out.floating |= rule.floating;
        out.fake_fullscreen |= rule.fake_fullscreen;
        if rule.monitor.is_some() {
            out.monitor = rule.monitor;
        }
        if rule.float_rect.is_some() {
            out.float_rect = rule.float_rect;
        }
    }
    out
}

/// Resolve the tag mask a newly managed client should carry: the matched
/// rules' OR, or (if none matched and it is not scratchpad-bound) the
/// current monitor's active view (spec.md §4.10 "If no rule yields tags...
/// inherit the current monitor's active tag mask").
pub fn resolve_tags(matched: TagMask, current_view: TagMask) -> TagMask {
    if matched.is_empty() {
        current_view
    } else {
        matched
    }
}

/// Per-monitor rule overrides keyed by monitor number (`None` = wildcard)
/// and tag index (`None` = wildcard), populating pertag slots at
/// `createmon` time (spec.md §4.7).
#[derive(Debug, Clone)]
pub struct MonitorRule {
    pub monitor: Option<usize>,
    pub tag: Option<usize>,
    pub layout: Option<crate::layout::LayoutKind>,
    pub mfact: Option<f64>,
    pub nmaster: Option<usize>,
    pub showbar: Option<bool>,
    pub topbar: Option<bool>,
}

impl MonitorRule {
    fn applies(&self, monitor: usize, tag: usize) -> bool {
        self.monitor.map(|m| m == monitor).unwrap_or(true) && self.tag.map(|t| t == tag).unwrap_or(true)
    }
}

/// Apply every matching monitor rule's overrides, in order, into a pertag slot.
pub fn apply_monitor_rules(rules: &[MonitorRule], monitor: usize, tag: usize, slot: &mut crate::pertag::PertagSlot) {
    for rule in rules.iter().filter(|r| r.applies(monitor, tag)) {
        if let Some(l) = rule.layout {
            slot.layout = l;
        }
        if let Some(f) = rule.mfact {
            slot.mfact = f;
        }
        if let Some(n) = rule.nmaster {
            slot.nmaster = n;
        }
        if let Some(b) = rule.showbar {
            slot.showbar = b;
        }
        let _ = rule.topbar;
    }
}

/// Launch a program without blocking the event loop (spec.md §5: accepted
/// design hazard of `system()`/`popen()` "should be replaced with
/// non-blocking process launch in a reimplementation"). SIGCHLD is set to
/// `SIG_IGN` by `core::WindowManager::run`, so the kernel reaps the child
/// automatically and no `wait()` call is needed here.
pub fn spawn(program: &str, args: &[String]) -> crate::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| crate::Error::Spawn(program.to_string(), e))
}

/// Run every configured autostart command, logging (not aborting on)
/// individual failures (spec.md §C "autostart").
pub fn run_autostart(commands: &[(String, Vec<String>)]) {
    for (program, args) in commands {
        if let Err(e) = spawn(program, args) {
            tracing::warn!(%program, %e, "autostart command failed to launch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_rules_or_their_tag_masks_together() {
        let rules = vec![
            Rule { class: "Foo".into(), tags: TagMask::nth(1), ..Default::default() },
            Rule { title: "bar".into(), tags: TagMask::nth(3), floating: true, ..Default::default() },
        ];
        let m = apply_rules(&rules, "Foo", "foo", "has bar in it");
        assert_eq!(m.tags, TagMask::nth(1) | TagMask::nth(3));
        assert!(m.floating);
    }

    #[test]
    fn no_match_falls_back_to_current_view() {
        let resolved = resolve_tags(TagMask::empty(), TagMask::nth(4));
        assert_eq!(resolved, TagMask::nth(4));
    }

    #[test]
    fn monitor_rule_wildcards_apply_to_every_monitor_and_tag() {
        let rules = vec![MonitorRule {
            monitor: None,
            tag: Some(2),
            layout: Some(crate::layout::LayoutKind::Monocle),
            mfact: None,
            nmaster: None,
            showbar: None,
            topbar: None,
        }];
        let mut slot = crate::pertag::PertagSlot::default();
        apply_monitor_rules(&rules, 3, 2, &mut slot);
        assert_eq!(slot.layout, crate::layout::LayoutKind::Monocle);

        let mut untouched = crate::pertag::PertagSlot::default();
        apply_monitor_rules(&rules, 3, 1, &mut untouched);
        assert_eq!(untouched.layout, crate::layout::LayoutKind::Tile);
    }
}
