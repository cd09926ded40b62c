//! Behaviour shared by posts and comments.

use std::sync::Arc;

use crate::background;
use crate::dispatch::{Dispatch, Params, SharedDispatch};
use crate::error::{self, Error};
use crate::models;
use crate::options::CommentSort;

/// Fullname prefix of comments.
pub const COMMENT_PREFIX: &str = "t1_";
/// Fullname prefix of link posts.
pub const LINK_PREFIX: &str = "t3_";

/// Join `prefix` and `id` into a fullname unless an explicit one was
/// supplied.
pub(crate) fn fullname_or(explicit: Option<&str>, prefix: &str, id: Option<&str>) -> String {
    match (explicit, id) {
        (Some(name), _) => name.to_string(),
        (None, Some(id)) if !id.is_empty() => format!("{}{}", prefix, id),
        _ => String::new(),
    }
}

/// Reasons accompanying a [`report`](Content::report) call.
///
/// Each free-text field has a documented length ceiling, counted in
/// characters and checked before the call is dispatched.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Free-form details, at most 2000 characters
    pub additional_info: Option<String>,
    /// Names of ban-evading accounts, at most 1000 characters
    pub ban_evading_accounts: Option<String>,
    /// Custom report text, at most 250 characters
    pub custom_text: Option<String>,
    /// Whether the report originates from the help center
    pub from_help_center: bool,
    /// Free-form reason, at most 100 characters
    pub other_reason: Option<String>,
    /// Report reason, at most 100 characters
    pub reason: Option<String>,
    /// Subreddit rule being violated, at most 100 characters
    pub rule_reason: Option<String>,
    /// Site rule being violated, at most 100 characters
    pub site_reason: Option<String>,
    /// Username being reported
    pub violator_username: Option<String>,
}

impl Report {
    /// Check the length ceilings and build the form parameters.
    fn params(&self, subreddit: &str) -> Result<Params, Error> {
        if let Some(info) = &self.additional_info {
            error::check_len("additional_info", info, 2000)?;
        }
        if let Some(accounts) = &self.ban_evading_accounts {
            error::check_len("ban_evading_accounts", accounts, 1000)?;
        }
        if let Some(text) = &self.custom_text {
            error::check_len("custom_text", text, 250)?;
        }
        for (field, value) in [
            ("other_reason", &self.other_reason),
            ("reason", &self.reason),
            ("rule_reason", &self.rule_reason),
            ("site_reason", &self.site_reason),
        ] {
            if let Some(value) = value {
                error::check_len(field, value, 100)?;
            }
        }

        let mut params: Params = vec![
            ("from_help_center", self.from_help_center.to_string()),
            ("sr_name", subreddit.to_string()),
        ];
        push_opt(&mut params, "additional_info", &self.additional_info);
        push_opt(
            &mut params,
            "ban_evading_accounts_names",
            &self.ban_evading_accounts,
        );
        push_opt(&mut params, "custom_text", &self.custom_text);
        push_opt(&mut params, "other_reason", &self.other_reason);
        push_opt(&mut params, "reason", &self.reason);
        push_opt(&mut params, "rule_reason", &self.rule_reason);
        push_opt(&mut params, "site_reason", &self.site_reason);
        push_opt(&mut params, "usernames", &self.violator_username);
        Ok(params)
    }
}

fn push_opt(params: &mut Params, key: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        params.push((key, value.clone()));
    }
}

/// Submit a mutation and check the response envelope for reported
/// errors. Endpoints with no meaningful result answer with an empty
/// body, which passes through untouched.
fn submit(
    dispatch: &dyn Dispatch,
    operation: &'static str,
    fullname: &str,
    params: Params,
) -> Result<(), Error> {
    let result = dispatch.submit(operation, fullname, params)?;
    if let Some(value) = result {
        if let Some(message) = models::api_errors(&value) {
            return Err(Error::Remote { operation, message });
        }
    }
    Ok(())
}

fn state_param(enable: bool) -> Params {
    vec![("state", enable.to_string())]
}

fn sticky(
    dispatch: &dyn Dispatch,
    fullname: &str,
    slot: u32,
    state: bool,
    to_profile: bool,
) -> Result<(), Error> {
    error::check_range("num", i64::from(slot), 1, 4)?;
    submit(
        dispatch,
        "set_subreddit_sticky",
        fullname,
        vec![
            ("num", slot.to_string()),
            ("state", state.to_string()),
            ("to_profile", to_profile.to_string()),
        ],
    )
}

fn suggested_sort(
    dispatch: &dyn Dispatch,
    fullname: &str,
    sort: Option<CommentSort>,
) -> Result<(), Error> {
    let sort = sort.map(|sort| sort.as_str().to_string()).unwrap_or_default();
    submit(dispatch, "set_suggested_sort", fullname, vec![("sort", sort)])
}

fn report(
    dispatch: &dyn Dispatch,
    fullname: &str,
    subreddit: &str,
    reasons: &Report,
) -> Result<(), Error> {
    let params = reasons.params(subreddit)?;
    submit(dispatch, "report", fullname, params)
}

/// Run `job` on the background pool with a handle to the thing. The
/// job's outcome, success or failure, is dropped.
fn defer<F>(dispatch: &SharedDispatch, fullname: &str, job: F)
where
    F: FnOnce(&dyn Dispatch, &str) -> Result<(), Error> + Send + 'static,
{
    let dispatch = Arc::clone(dispatch);
    let fullname = fullname.to_string();
    background::spawn(move || {
        let _ = job(dispatch.as_ref(), &fullname);
    });
}

/// The surface shared by posts and comments: identity, plus every
/// mutating call that addresses a thing by its fullname.
///
/// Mutations are remote-only. A successful call does not touch the local
/// copy — re-import the thing from a fresh listing to observe its new
/// state.
///
/// Every mutation has an `*_async` twin that schedules the identical
/// call, including its parameter checks, on a background task and
/// discards the outcome. The twins return immediately, never block and
/// never raise; use the plain form when the outcome matters.
pub trait Content {
    /// Dispatcher used for remote calls.
    fn dispatch(&self) -> &SharedDispatch;

    /// Globally unique identifier of this thing.
    fn fullname(&self) -> &str;

    /// Name of the subreddit this thing lives in.
    fn subreddit(&self) -> &str;

    /// Delete this thing.
    fn delete(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "del", self.fullname(), Params::new())
    }

    /// Delete this thing on a background task.
    fn delete_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "del", fullname, Params::new())
        });
    }

    /// Hide this thing, removing it from the user's default listings.
    fn hide(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "hide", self.fullname(), Params::new())
    }

    /// Hide this thing on a background task.
    fn hide_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "hide", fullname, Params::new())
        });
    }

    /// Unhide this thing.
    fn unhide(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "unhide", self.fullname(), Params::new())
    }

    /// Unhide this thing on a background task.
    fn unhide_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "unhide", fullname, Params::new())
        });
    }

    /// Lock this thing, preventing new replies.
    fn lock(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "lock", self.fullname(), Params::new())
    }

    /// Lock this thing on a background task.
    fn lock_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "lock", fullname, Params::new())
        });
    }

    /// Unlock this thing, allowing new replies again.
    fn unlock(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "unlock", self.fullname(), Params::new())
    }

    /// Unlock this thing on a background task.
    fn unlock_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "unlock", fullname, Params::new())
        });
    }

    /// Mark this thing as not safe for work.
    fn mark_nsfw(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "marknsfw", self.fullname(), Params::new())
    }

    /// Mark this thing as not safe for work on a background task.
    fn mark_nsfw_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "marknsfw", fullname, Params::new())
        });
    }

    /// Remove the not-safe-for-work marking.
    fn unmark_nsfw(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "unmarknsfw", self.fullname(), Params::new())
    }

    /// Remove the not-safe-for-work marking on a background task.
    fn unmark_nsfw_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "unmarknsfw", fullname, Params::new())
        });
    }

    /// Mark this thing as containing spoilers.
    fn spoiler(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "spoiler", self.fullname(), Params::new())
    }

    /// Mark this thing as containing spoilers on a background task.
    fn spoiler_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "spoiler", fullname, Params::new())
        });
    }

    /// Remove the spoiler marking.
    fn unspoiler(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "unspoiler", self.fullname(), Params::new())
    }

    /// Remove the spoiler marking on a background task.
    fn unspoiler_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "unspoiler", fullname, Params::new())
        });
    }

    /// Save this thing, keeping it in the user's saved listing,
    /// optionally under a category.
    fn save(&self, category: Option<&str>) -> Result<(), Error> {
        let mut params = Params::new();
        push_opt(&mut params, "category", &category.map(str::to_string));
        submit(self.dispatch().as_ref(), "save", self.fullname(), params)
    }

    /// Save this thing on a background task.
    fn save_async(&self, category: Option<&str>) {
        let category = category.map(str::to_string);
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            let mut params = Params::new();
            push_opt(&mut params, "category", &category);
            submit(dispatch, "save", fullname, params)
        });
    }

    /// Unsave this thing, removing it from the user's saved listings.
    fn unsave(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "unsave", self.fullname(), Params::new())
    }

    /// Unsave this thing on a background task.
    fn unsave_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "unsave", fullname, Params::new())
        });
    }

    /// Enable or disable inbox replies for this thing.
    fn send_replies(&self, enable: bool) -> Result<(), Error> {
        submit(
            self.dispatch().as_ref(),
            "sendreplies",
            self.fullname(),
            state_param(enable),
        )
    }

    /// Enable or disable inbox replies on a background task.
    fn send_replies_async(&self, enable: bool) {
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            submit(dispatch, "sendreplies", fullname, state_param(enable))
        });
    }

    /// Enable or disable contest mode for this thing's replies.
    fn set_contest_mode(&self, enable: bool) -> Result<(), Error> {
        submit(
            self.dispatch().as_ref(),
            "set_contest_mode",
            self.fullname(),
            state_param(enable),
        )
    }

    /// Enable or disable contest mode on a background task.
    fn set_contest_mode_async(&self, enable: bool) {
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            submit(dispatch, "set_contest_mode", fullname, state_param(enable))
        });
    }

    /// Sticky this thing into the given subreddit slot.
    ///
    /// `slot` must be between 1 and 4; a post already stickied in that
    /// slot is replaced.
    fn set_sticky(&self, slot: u32, to_profile: bool) -> Result<(), Error> {
        sticky(self.dispatch().as_ref(), self.fullname(), slot, true, to_profile)
    }

    /// Sticky this thing on a background task.
    fn set_sticky_async(&self, slot: u32, to_profile: bool) {
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            sticky(dispatch, fullname, slot, true, to_profile)
        });
    }

    /// Remove this thing from the given sticky slot.
    fn unset_sticky(&self, slot: u32, to_profile: bool) -> Result<(), Error> {
        sticky(self.dispatch().as_ref(), self.fullname(), slot, false, to_profile)
    }

    /// Remove this thing from its sticky slot on a background task.
    fn unset_sticky_async(&self, slot: u32, to_profile: bool) {
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            sticky(dispatch, fullname, slot, false, to_profile)
        });
    }

    /// Set the suggested sort for this thing's replies. `None` clears
    /// the suggestion.
    fn set_suggested_sort(&self, sort: Option<CommentSort>) -> Result<(), Error> {
        suggested_sort(self.dispatch().as_ref(), self.fullname(), sort)
    }

    /// Set the suggested sort on a background task.
    fn set_suggested_sort_async(&self, sort: Option<CommentSort>) {
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            suggested_sort(dispatch, fullname, sort)
        });
    }

    /// Report this thing to the subreddit moderators. The thing becomes
    /// implicitly hidden as well.
    fn report(&self, reasons: &Report) -> Result<(), Error> {
        report(
            self.dispatch().as_ref(),
            self.fullname(),
            self.subreddit(),
            reasons,
        )
    }

    /// Report this thing on a background task. The length ceilings are
    /// checked inside the task; a violation is dropped with the rest of
    /// the outcome.
    fn report_async(&self, reasons: Report) {
        let subreddit = self.subreddit().to_string();
        defer(self.dispatch(), self.fullname(), move |dispatch, fullname| {
            report(dispatch, fullname, &subreddit, &reasons)
        });
    }

    /// Approve this thing, re-inserting it into listings and discarding
    /// any reports on it.
    fn approve(&self) -> Result<(), Error> {
        submit(self.dispatch().as_ref(), "approve", self.fullname(), Params::new())
    }

    /// Approve this thing on a background task.
    fn approve_async(&self) {
        defer(self.dispatch(), self.fullname(), |dispatch, fullname| {
            submit(dispatch, "approve", fullname, Params::new())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Validation;

    #[test]
    fn fullname_prefers_explicit_value() {
        assert_eq!(
            fullname_or(Some("t3_xyz"), LINK_PREFIX, Some("abc")),
            "t3_xyz"
        );
    }

    #[test]
    fn fullname_derived_from_id() {
        assert_eq!(fullname_or(None, LINK_PREFIX, Some("abc")), "t3_abc");
        assert_eq!(fullname_or(None, COMMENT_PREFIX, Some("abc")), "t1_abc");
    }

    #[test]
    fn fullname_empty_without_id() {
        assert_eq!(fullname_or(None, LINK_PREFIX, None), "");
        assert_eq!(fullname_or(None, LINK_PREFIX, Some("")), "");
    }

    #[test]
    fn report_ceilings_are_inclusive() {
        let mut reasons = Report::default();
        reasons.additional_info = Some("a".repeat(2000));
        assert!(reasons.params("rust").is_ok());

        reasons.additional_info = Some("a".repeat(2001));
        match reasons.params("rust") {
            Err(Error::Validation(Validation::TooLong { field, max, .. })) => {
                assert_eq!(field, "additional_info");
                assert_eq!(max, 2000);
            }
            other => panic!("expected TooLong, got {:?}", other),
        }
    }

    #[test]
    fn report_checks_every_ceiling() {
        fn text(len: usize) -> Option<String> {
            Some("a".repeat(len))
        }

        let at_ceiling = Report {
            additional_info: text(2000),
            ban_evading_accounts: text(1000),
            custom_text: text(250),
            other_reason: text(100),
            reason: text(100),
            rule_reason: text(100),
            site_reason: text(100),
            ..Report::default()
        };
        assert!(at_ceiling.params("rust").is_ok());

        let over = |reasons: Report| assert!(reasons.params("rust").is_err());
        over(Report {
            ban_evading_accounts: text(1001),
            ..Report::default()
        });
        over(Report {
            custom_text: text(251),
            ..Report::default()
        });
        over(Report {
            other_reason: text(101),
            ..Report::default()
        });
        over(Report {
            reason: text(101),
            ..Report::default()
        });
        over(Report {
            rule_reason: text(101),
            ..Report::default()
        });
        over(Report {
            site_reason: text(101),
            ..Report::default()
        });
    }

    #[test]
    fn report_params_carry_the_subreddit() {
        let reasons = Report {
            reason: Some("spam".to_string()),
            ..Report::default()
        };
        let params = reasons.params("rust").unwrap();
        assert!(params.contains(&("sr_name", "rust".to_string())));
        assert!(params.contains(&("reason", "spam".to_string())));
        assert!(params.contains(&("from_help_center", "false".to_string())));
    }

    #[test]
    fn sticky_slot_range() {
        use crate::models::Replies;
        use crate::options::CommentOptions;
        use serde_json::Value;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(AtomicUsize);

        impl Dispatch for Counting {
            fn comments(
                &self,
                _link_id: &str,
                _subreddit: Option<&str>,
                _options: &CommentOptions,
            ) -> Result<Replies, Error> {
                Ok(Replies::default())
            }

            fn submit(
                &self,
                _operation: &'static str,
                _fullname: &str,
                _params: Params,
            ) -> Result<Option<Value>, Error> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }

            fn more_children(
                &self,
                _link_fullname: &str,
                _children: &[String],
                _limit_children: bool,
                _sort: CommentSort,
                _more_id: Option<&str>,
            ) -> Result<Vec<crate::models::CommentData>, Error> {
                Ok(Vec::new())
            }
        }

        let dispatch = Counting(AtomicUsize::new(0));

        assert!(sticky(&dispatch, "t3_abc", 0, true, false).is_err());
        assert!(sticky(&dispatch, "t3_abc", 5, true, false).is_err());
        // the slot checks fail before anything is dispatched
        assert_eq!(dispatch.0.load(Ordering::SeqCst), 0);

        assert!(sticky(&dispatch, "t3_abc", 1, true, false).is_ok());
        assert!(sticky(&dispatch, "t3_abc", 4, false, true).is_ok());
        assert_eq!(dispatch.0.load(Ordering::SeqCst), 2);
    }
}
