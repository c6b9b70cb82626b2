use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::JobError;

/// Logical queues a job can belong to. The queue is derived from the first
/// dot-delimited segment of the job name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Queue {
    Student,
    MemberEmail,
    OnboardingSession,
    OneTimeCode,
    ResumeReview,
    PeerHelp,
    Airtable,
    Application,
    Event,
    Feed,
    Gamification,
    Mailchimp,
    Notification,
    Offer,
    Opportunity,
    Profile,
    Slack,
}

impl Queue {
    /// Every queue, in declaration order. Used by the registry completeness
    /// check and the builtin processor registration.
    pub const ALL: [Queue; 17] = [
        Queue::Student,
        Queue::MemberEmail,
        Queue::OnboardingSession,
        Queue::OneTimeCode,
        Queue::ResumeReview,
        Queue::PeerHelp,
        Queue::Airtable,
        Queue::Application,
        Queue::Event,
        Queue::Feed,
        Queue::Gamification,
        Queue::Mailchimp,
        Queue::Notification,
        Queue::Offer,
        Queue::Opportunity,
        Queue::Profile,
        Queue::Slack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::Student => "student",
            Queue::MemberEmail => "member_email",
            Queue::OnboardingSession => "onboarding_session",
            Queue::OneTimeCode => "one_time_code",
            Queue::ResumeReview => "resume_review",
            Queue::PeerHelp => "peer_help",
            Queue::Airtable => "airtable",
            Queue::Application => "application",
            Queue::Event => "event",
            Queue::Feed => "feed",
            Queue::Gamification => "gamification",
            Queue::Mailchimp => "mailchimp",
            Queue::Notification => "notification",
            Queue::Offer => "offer",
            Queue::Opportunity => "opportunity",
            Queue::Profile => "profile",
            Queue::Slack => "slack",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Queue> {
        match prefix {
            "student" => Some(Queue::Student),
            "member_email" => Some(Queue::MemberEmail),
            "onboarding_session" => Some(Queue::OnboardingSession),
            "one_time_code" => Some(Queue::OneTimeCode),
            "resume_review" => Some(Queue::ResumeReview),
            "peer_help" => Some(Queue::PeerHelp),
            "airtable" => Some(Queue::Airtable),
            "application" => Some(Queue::Application),
            "event" => Some(Queue::Event),
            "feed" => Some(Queue::Feed),
            "gamification" => Some(Queue::Gamification),
            "mailchimp" => Some(Queue::Mailchimp),
            "notification" => Some(Queue::Notification),
            "offer" => Some(Queue::Offer),
            "opportunity" => Some(Queue::Opportunity),
            "profile" => Some(Queue::Profile),
            "slack" => Some(Queue::Slack),
            _ => None,
        }
    }

    /// Resolve a job name to its queue via the name's first segment.
    ///
    /// A name without a dot is treated as a bare prefix. Unknown prefixes are
    /// a hard error at enqueue time.
    pub fn resolve(name: &str) -> Result<Queue, JobError> {
        let prefix = name.split_once('.').map_or(name, |(prefix, _)| prefix);

        Queue::from_prefix(prefix).ok_or_else(|| JobError::UnknownQueue {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
