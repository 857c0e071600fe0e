//! Backward history search and substitution.
//!
//! The engine walks a history snapshot from newest to oldest, filters
//! candidates, and rewrites the first one the directive matches. Every
//! regex run happens on a worker thread under a [`Deadline`].

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use slirc_text::{ctcp, is_strict_nick};

use super::deadline::{Deadline, Stage};
use super::directive::Directive;
use super::template::{self, Template};
use crate::config::{ChannelPolicy, ReplacerConfig};
use crate::error::ReplacerError;
use crate::history::{EntryKind, HistoryLog, MessageId};
use crate::ignore::IgnoreCheck;

/// The message that carried the directive.
#[derive(Debug, Clone, Copy)]
pub struct Trigger<'a> {
    /// History id of the directive message itself.
    pub id: MessageId,
    pub channel: &'a str,
    pub nick: &'a str,
}

/// Result of a search that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The channel has the replacer disabled; nothing was searched.
    Skipped,
    /// A message matched; `announcement` is the text to send.
    Replaced {
        announcement: String,
        matched: MessageId,
        /// How long ago the corrected message was received.
        age_ms: i64,
    },
    /// No eligible message matched. `scanned` counts the entries visited.
    NotFound { scanned: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Engine {
    deadline: Deadline,
    nick_max_len: usize,
}

impl Engine {
    pub fn new(budget: Duration, nick_max_len: usize) -> Self {
        Self {
            deadline: Deadline::new(budget),
            nick_max_len,
        }
    }

    pub fn from_config(config: &ReplacerConfig) -> Self {
        Self::new(config.timeout(), config.nick_max_len)
    }

    pub fn budget(&self) -> Duration {
        self.deadline.budget()
    }

    /// Search `history` for the newest message `directive` applies to.
    ///
    /// Entries at or after the trigger are never candidates. A target
    /// nick that is not a valid nickname ends the search at the first
    /// candidate that reaches the nick filter.
    pub fn execute(
        &self,
        directive: &Directive,
        trigger: &Trigger<'_>,
        history: &dyn HistoryLog,
        policy: &ChannelPolicy,
        ignores: &dyn IgnoreCheck,
    ) -> Result<SearchOutcome, ReplacerError> {
        if !policy.enable {
            return Ok(SearchOutcome::Skipped);
        }

        history.mark_replacer_output(trigger.id);
        let snapshot = history.snapshot();

        let target = directive.target_nick();
        let target_valid = target.is_some_and(|nick| is_strict_nick(nick, self.nick_max_len));
        let template = Arc::new(if policy.bold_replacement_text {
            directive.replacement().emboldened()
        } else {
            directive.replacement().clone()
        });

        let mut scanned = 0;
        for entry in snapshot.iter().rev().skip_while(|entry| entry.id >= trigger.id) {
            scanned += 1;

            if entry.kind != EntryKind::Privmsg || entry.channel != trigger.channel {
                continue;
            }
            match target {
                Some(nick) if !target_valid => {
                    debug!(nick = %nick, scanned, "Directive addressed to an invalid nick");
                    return Ok(SearchOutcome::NotFound { scanned });
                }
                Some(nick) if entry.nick != nick => continue,
                Some(_) => {}
                None if ignores.is_ignored(&entry.address) => {
                    trace!(id = %entry.id, address = %entry.address, "Skipping ignored author");
                    continue;
                }
                None => {}
            }
            if policy.ignore_regex && entry.is_replacer_tagged() {
                continue;
            }

            let action = ctcp::unwrap_action(&entry.text);
            let text = action.unwrap_or(&entry.text);

            if !self.is_match(directive, text)? {
                continue;
            }

            let replaced = self.substitute(directive, &template, text)?;
            let body = if action.is_some() {
                ctcp::narrate_action(&entry.nick, &replaced)
            } else {
                replaced
            };
            let announcement = if entry.nick == trigger.nick {
                format!("{} meant to say: {}", entry.nick, body)
            } else {
                format!("{} thinks {}: {}", trigger.nick, entry.nick, body)
            };
            return Ok(SearchOutcome::Replaced {
                announcement,
                matched: entry.id,
                age_ms: entry.age_ms(Utc::now()),
            });
        }

        Ok(SearchOutcome::NotFound { scanned })
    }

    fn is_match(&self, directive: &Directive, text: &str) -> Result<bool, ReplacerError> {
        let regex = Arc::clone(directive.pattern());
        let text = text.to_owned();
        self.bounded(Stage::Match, move || regex.is_match(&text))
    }

    fn substitute(
        &self,
        directive: &Directive,
        template: &Arc<Template>,
        text: &str,
    ) -> Result<String, ReplacerError> {
        let regex = Arc::clone(directive.pattern());
        let template = Arc::clone(template);
        let text = text.to_owned();
        let replace_all = directive.replace_all();
        self.bounded(Stage::Substitute, move || {
            template::substitute(&regex, &template, &text, replace_all)
        })
    }

    fn bounded<T, F>(&self, stage: Stage, job: F) -> Result<T, ReplacerError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, fancy_regex::Error> + Send + 'static,
    {
        match self.deadline.run(stage, job) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ReplacerError::from_regex(stage, self.budget(), e)),
            Err(e) => Err(ReplacerError::from_deadline(stage, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{NewMessage, RingHistory};
    use crate::ignore::{HostmaskIgnores, NoIgnores};
    use crate::replacer::directive::CompileOptions;
    use slirc_text::Casemapping;
    use std::time::Instant;

    const CHAN: &str = "#test";

    fn engine() -> Engine {
        Engine::new(Duration::from_secs(2), 30)
    }

    fn plain() -> ChannelPolicy {
        ChannelPolicy {
            bold_replacement_text: false,
            ..ChannelPolicy::default()
        }
    }

    fn say(history: &RingHistory, nick: &str, text: &str) -> MessageId {
        history.append(NewMessage::privmsg(CHAN, &format!("{nick}!u@host"), text))
    }

    fn run(
        history: &RingHistory,
        nick: &str,
        text: &str,
        policy: &ChannelPolicy,
        ignores: &dyn IgnoreCheck,
    ) -> Result<SearchOutcome, ReplacerError> {
        let id = say(history, nick, text);
        let directive = Directive::parse(text, &CompileOptions::default()).unwrap();
        let trigger = Trigger {
            id,
            channel: CHAN,
            nick,
        };
        engine().execute(&directive, &trigger, history, policy, ignores)
    }

    fn announcement(outcome: SearchOutcome) -> String {
        match outcome {
            SearchOutcome::Replaced { announcement, .. } => announcement,
            other => panic!("expected a replacement, got {other:?}"),
        }
    }

    #[test]
    fn test_first_occurrence() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let out = run(&history, "alice", "s/a/b/", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: bbc");
    }

    #[test]
    fn test_global_flag() {
        let history = RingHistory::new(10);
        say(&history, "alice", "aaa");
        let out = run(&history, "alice", "s/a/b/g", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: bbb");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let history = RingHistory::new(10);
        say(&history, "alice", "Hello");
        let out = run(&history, "alice", "s/HELLO/bye/i", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: bye");

        let history = RingHistory::new(10);
        say(&history, "alice", "Hello");
        let out = run(&history, "alice", "s/HELLO/bye/", &plain(), &NoIgnores).unwrap();
        assert!(matches!(out, SearchOutcome::NotFound { .. }));
    }

    #[test]
    fn test_newest_match_wins() {
        let history = RingHistory::new(10);
        say(&history, "alice", "old cat");
        say(&history, "bob", "new cat");
        say(&history, "carol", "no match here");
        let out = run(&history, "alice", "s/cat/dog/", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice thinks bob: new dog");
    }

    #[test]
    fn test_target_nick_restricts_author() {
        let history = RingHistory::new(10);
        say(&history, "alice", "alice typo");
        say(&history, "bob", "bob typo");
        let out = run(&history, "carol", "alice: s/typo/fixed/", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "carol thinks alice: alice fixed");
    }

    #[test]
    fn test_invalid_target_aborts_search() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        say(&history, "bob", "xyz");
        let out = run(&history, "carol", "9bad: s/a/b/", &plain(), &NoIgnores).unwrap();
        assert_eq!(out, SearchOutcome::NotFound { scanned: 1 });
    }

    #[test]
    fn test_ignored_authors_skipped_unless_targeted() {
        let ignores = HostmaskIgnores::new(["spammer!*@*"], Casemapping::Rfc1459);

        let history = RingHistory::new(10);
        say(&history, "alice", "abc one");
        say(&history, "spammer", "abc two");
        let out = run(&history, "carol", "s/abc/xyz/", &plain(), &ignores).unwrap();
        assert_eq!(announcement(out), "carol thinks alice: xyz one");

        let out = run(&history, "carol", "spammer: s/abc/xyz/", &plain(), &ignores).unwrap();
        assert_eq!(announcement(out), "carol thinks spammer: xyz two");
    }

    #[test]
    fn test_other_channels_never_match() {
        let history = RingHistory::new(10);
        history.append(NewMessage::privmsg("#elsewhere", "alice!u@host", "abc"));
        let out = run(&history, "alice", "s/a/b/", &plain(), &NoIgnores).unwrap();
        assert_eq!(out, SearchOutcome::NotFound { scanned: 1 });
    }

    #[test]
    fn test_notices_are_not_candidates() {
        let history = RingHistory::new(10);
        history.append(NewMessage::privmsg(CHAN, "alice!u@host", "abc").with_kind(EntryKind::Notice));
        let out = run(&history, "alice", "s/a/b/", &plain(), &NoIgnores).unwrap();
        assert!(matches!(out, SearchOutcome::NotFound { .. }));
    }

    #[test]
    fn test_tagged_output_excluded() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        history.append(NewMessage::privmsg(CHAN, "replacer!r@bot", "alice meant to say: bbc").as_replacer_output());
        let out = run(&history, "alice", "s/b/x/", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: axc");
    }

    #[test]
    fn test_tagged_output_visible_when_allowed() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let earlier = say(&history, "alice", "s/q/z/");
        history.mark_replacer_output(earlier);
        let policy = ChannelPolicy {
            ignore_regex: false,
            ..plain()
        };
        let out = run(&history, "alice", "s/q/w/", &policy, &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: s/w/z/");
    }

    #[test]
    fn test_previous_directives_are_tagged() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        run(&history, "alice", "s/x/y/", &plain(), &NoIgnores).unwrap();
        // The earlier directive contains "x" but must not be a candidate.
        let out = run(&history, "alice", "s/x/z/", &plain(), &NoIgnores).unwrap();
        assert!(matches!(out, SearchOutcome::NotFound { scanned: 2 }));
    }

    #[test]
    fn test_actions_are_unwrapped_and_narrated() {
        let history = RingHistory::new(10);
        say(&history, "bob", "\x01ACTION eats a cake\x01");
        let out = run(&history, "alice", "s/cake/pie/", &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice thinks bob: * bob eats a pie");
    }

    #[test]
    fn test_bold_replacement() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let out = run(&history, "alice", "s/b/x/", &ChannelPolicy::default(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "alice meant to say: a\x02x\x02c");
    }

    #[test]
    fn test_disabled_channel_skips() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let policy = ChannelPolicy {
            enable: false,
            ..plain()
        };
        let out = run(&history, "alice", "s/a/b/", &policy, &NoIgnores).unwrap();
        assert_eq!(out, SearchOutcome::Skipped);
    }

    #[test]
    fn test_idempotent_over_unchanged_history() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let id = say(&history, "bob", "s/a/b/");
        let directive = Directive::parse("s/a/b/", &CompileOptions::default()).unwrap();
        let trigger = Trigger {
            id,
            channel: CHAN,
            nick: "bob",
        };
        let first = engine().execute(&directive, &trigger, &history, &plain(), &NoIgnores).unwrap();
        let second = engine().execute(&directive, &trigger, &history, &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(first), "bob thinks alice: bbc");
        assert_eq!(announcement(second), "bob thinks alice: bbc");
    }

    #[test]
    fn test_entries_after_trigger_are_ignored() {
        let history = RingHistory::new(10);
        say(&history, "alice", "abc");
        let id = say(&history, "bob", "s/a/b/");
        say(&history, "carol", "a later message");
        let directive = Directive::parse("s/a/b/", &CompileOptions::default()).unwrap();
        let trigger = Trigger {
            id,
            channel: CHAN,
            nick: "bob",
        };
        let out = engine().execute(&directive, &trigger, &history, &plain(), &NoIgnores).unwrap();
        assert_eq!(announcement(out), "bob thinks alice: bbc");
    }

    #[test]
    fn test_not_found_counts_scanned() {
        let history = RingHistory::new(10);
        say(&history, "alice", "one");
        say(&history, "bob", "two");
        let out = run(&history, "alice", "s/zzz/y/", &plain(), &NoIgnores).unwrap();
        assert_eq!(out, SearchOutcome::NotFound { scanned: 2 });
    }

    #[test]
    fn test_catastrophic_pattern_times_out() {
        let history = RingHistory::new(10);
        say(&history, "alice", &"x".repeat(40));
        let id = say(&history, "alice", "s/(?:(?=x)x|x)+y/z/");
        let directive = Directive::parse("s/(?:(?=x)x|x)+y/z/", &CompileOptions::default()).unwrap();
        let trigger = Trigger {
            id,
            channel: CHAN,
            nick: "alice",
        };

        let start = Instant::now();
        let engine = Engine::new(Duration::from_millis(50), 30);
        let err = engine
            .execute(&directive, &trigger, &history, &plain(), &NoIgnores)
            .unwrap_err();
        assert!(matches!(err, ReplacerError::Timeout { stage: Stage::Match, .. }), "{err:?}");
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_replacement_reports_matched_entry() {
        let history = RingHistory::new(10);
        let original = say(&history, "alice", "abc");
        say(&history, "bob", "unrelated");
        let out = run(&history, "alice", "s/b/x/", &plain(), &NoIgnores).unwrap();
        match out {
            SearchOutcome::Replaced { matched, age_ms, .. } => {
                assert_eq!(matched, original);
                assert!((0..5_000).contains(&age_ms), "{age_ms}");
            }
            other => panic!("expected a replacement, got {other:?}"),
        }
    }
}
