use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JobError;
use crate::models::Queue;

/// Which backend carries a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Published to the HTTP broker and executed via the webhook callback.
    Immediate,
    /// Persisted as a `jobs` row and executed by the batch runner.
    Scheduled,
}

/// Every job the platform enqueues, tagged on the wire as
/// `{"name": "...", "data": {...}}`.
///
/// Deserializing the envelope is the payload validation: an undeclared name
/// or a payload missing required fields is rejected before either backend is
/// touched. Unknown payload keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum JobRequest {
    // Real-time jobs, delivered through the broker.
    #[serde(rename = "slack.message.add", rename_all = "camelCase")]
    SlackMessageAdd {
        channel: String,
        text: String,
        thread_id: Option<String>,
        user_id: Option<String>,
    },

    #[serde(rename = "slack.message.change")]
    SlackMessageChange {
        channel: String,
        id: String,
        text: String,
    },

    #[serde(rename = "slack.message.delete")]
    SlackMessageDelete { channel: String, id: String },

    #[serde(rename = "notification.email.send")]
    NotificationEmailSend {
        to: String,
        subject: String,
        body: Option<String>,
    },

    #[serde(rename = "notification.slack.send")]
    NotificationSlackSend {
        message: String,
        channel: Option<String>,
        workspace: Option<String>,
    },

    #[serde(rename = "notification.sms.send", rename_all = "camelCase")]
    NotificationSmsSend { phone_number: String, message: String },

    #[serde(rename = "slack.emoji.changed")]
    SlackEmojiChanged {
        subtype: String,
        name: Option<String>,
        value: Option<String>,
    },

    #[serde(rename = "slack.reaction.added", rename_all = "camelCase")]
    SlackReactionAdded {
        channel_id: String,
        message_id: String,
        reaction: String,
        user_id: String,
    },

    #[serde(rename = "slack.reaction.removed", rename_all = "camelCase")]
    SlackReactionRemoved {
        channel_id: String,
        message_id: String,
        reaction: String,
        user_id: String,
    },

    #[serde(rename = "slack.invite")]
    SlackInvite { email: String },

    #[serde(rename = "slack.deactivate", rename_all = "camelCase")]
    SlackDeactivate { slack_id: String },

    #[serde(rename = "slack.chatbot.message", rename_all = "camelCase")]
    SlackChatbotMessage {
        channel_id: String,
        id: String,
        text: String,
        thread_id: Option<String>,
        user_id: String,
    },

    #[serde(rename = "slack.message.answer", rename_all = "camelCase")]
    SlackMessageAnswer {
        channel_id: String,
        thread_id: String,
        text: String,
        user_id: String,
    },

    #[serde(rename = "slack.secured_the_bag.reminder", rename_all = "camelCase")]
    SlackSecuredTheBagReminder { message_id: String, user_id: String },

    // Named recurring and batch jobs, carried by the scheduled backend.
    #[serde(rename = "student.birthdate.daily")]
    StudentBirthdateDaily {},

    #[serde(rename = "student.anniversary.email")]
    StudentAnniversaryEmail {},

    #[serde(rename = "student.points.recurring")]
    StudentPointsRecurring {},

    #[serde(rename = "student.engagement.backfill", rename_all = "camelCase")]
    StudentEngagementBackfill { student_id: Option<String> },

    #[serde(rename = "student.statuses.backfill")]
    StudentStatusesBackfill {},

    #[serde(rename = "student.statuses.new")]
    StudentStatusesNew {},

    #[serde(rename = "airtable.record.update.bulk")]
    AirtableRecordUpdateBulk { records: Vec<AirtableRecordUpdate> },

    #[serde(rename = "feed.slack.recurring")]
    FeedSlackRecurring {},

    #[serde(rename = "event.recent.sync")]
    EventRecentSync {},

    #[serde(rename = "event.sync", rename_all = "camelCase")]
    EventSync { event_id: String },

    #[serde(rename = "opportunity.check_expired")]
    OpportunityCheckExpired {},

    #[serde(rename = "peer_help.finish_reminder", rename_all = "camelCase")]
    PeerHelpFinishReminder { help_request_id: String },

    // Jobs declared by the per-queue workers; scheduled by default.
    #[serde(rename = "slack.birthdates.update")]
    SlackBirthdatesUpdate {},

    #[serde(rename = "slack.channel.archive")]
    SlackChannelArchive { id: String },

    #[serde(rename = "slack.channel.create")]
    SlackChannelCreate { id: String, name: String },

    #[serde(rename = "slack.channel.delete")]
    SlackChannelDelete { id: String },

    #[serde(rename = "slack.channel.rename")]
    SlackChannelRename { id: String, name: String },

    #[serde(rename = "slack.channel.unarchive")]
    SlackChannelUnarchive { id: String },

    #[serde(rename = "notification.slack.ephemeral.send", rename_all = "camelCase")]
    NotificationSlackEphemeralSend {
        channel: String,
        text: String,
        user_id: String,
    },

    #[serde(rename = "one_time_code.expire", rename_all = "camelCase")]
    OneTimeCodeExpire { one_time_code_id: String },

    #[serde(rename = "member_email.added", rename_all = "camelCase")]
    MemberEmailAdded { email: String, student_id: String },

    #[serde(rename = "member_email.primary.changed", rename_all = "camelCase")]
    MemberEmailPrimaryChanged {
        previous_email: String,
        student_id: String,
    },

    #[serde(rename = "profile.views.notification.monthly")]
    ProfileViewsNotificationMonthly {},

    #[serde(rename = "onboarding_session.attended", rename_all = "camelCase")]
    OnboardingSessionAttended {
        onboarding_session_id: String,
        student_id: String,
    },
}

/// One record in an `airtable.record.update.bulk` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirtableRecordUpdate {
    pub id: String,
    pub fields: Value,
}

impl JobRequest {
    /// Validate a raw `(name, data)` pair into a typed job.
    ///
    /// The queue prefix is resolved first so an unknown prefix reports
    /// `UnknownQueue` rather than a schema mismatch.
    pub fn parse(name: &str, data: Value) -> Result<JobRequest, JobError> {
        Queue::resolve(name)?;

        let envelope = serde_json::json!({ "name": name, "data": data });

        serde_json::from_value(envelope).map_err(|err| JobError::SchemaValidation {
            name: name.to_string(),
            reason: err.to_string(),
        })
    }

    /// The dot-delimited wire name.
    pub fn name(&self) -> &'static str {
        match self {
            JobRequest::SlackMessageAdd { .. } => "slack.message.add",
            JobRequest::SlackMessageChange { .. } => "slack.message.change",
            JobRequest::SlackMessageDelete { .. } => "slack.message.delete",
            JobRequest::NotificationEmailSend { .. } => "notification.email.send",
            JobRequest::NotificationSlackSend { .. } => "notification.slack.send",
            JobRequest::NotificationSmsSend { .. } => "notification.sms.send",
            JobRequest::SlackEmojiChanged { .. } => "slack.emoji.changed",
            JobRequest::SlackReactionAdded { .. } => "slack.reaction.added",
            JobRequest::SlackReactionRemoved { .. } => "slack.reaction.removed",
            JobRequest::SlackInvite { .. } => "slack.invite",
            JobRequest::SlackDeactivate { .. } => "slack.deactivate",
            JobRequest::SlackChatbotMessage { .. } => "slack.chatbot.message",
            JobRequest::SlackMessageAnswer { .. } => "slack.message.answer",
            JobRequest::SlackSecuredTheBagReminder { .. } => "slack.secured_the_bag.reminder",
            JobRequest::StudentBirthdateDaily {} => "student.birthdate.daily",
            JobRequest::StudentAnniversaryEmail {} => "student.anniversary.email",
            JobRequest::StudentPointsRecurring {} => "student.points.recurring",
            JobRequest::StudentEngagementBackfill { .. } => "student.engagement.backfill",
            JobRequest::StudentStatusesBackfill {} => "student.statuses.backfill",
            JobRequest::StudentStatusesNew {} => "student.statuses.new",
            JobRequest::AirtableRecordUpdateBulk { .. } => "airtable.record.update.bulk",
            JobRequest::FeedSlackRecurring {} => "feed.slack.recurring",
            JobRequest::EventRecentSync {} => "event.recent.sync",
            JobRequest::EventSync { .. } => "event.sync",
            JobRequest::OpportunityCheckExpired {} => "opportunity.check_expired",
            JobRequest::PeerHelpFinishReminder { .. } => "peer_help.finish_reminder",
            JobRequest::SlackBirthdatesUpdate {} => "slack.birthdates.update",
            JobRequest::SlackChannelArchive { .. } => "slack.channel.archive",
            JobRequest::SlackChannelCreate { .. } => "slack.channel.create",
            JobRequest::SlackChannelDelete { .. } => "slack.channel.delete",
            JobRequest::SlackChannelRename { .. } => "slack.channel.rename",
            JobRequest::SlackChannelUnarchive { .. } => "slack.channel.unarchive",
            JobRequest::NotificationSlackEphemeralSend { .. } => "notification.slack.ephemeral.send",
            JobRequest::OneTimeCodeExpire { .. } => "one_time_code.expire",
            JobRequest::MemberEmailAdded { .. } => "member_email.added",
            JobRequest::MemberEmailPrimaryChanged { .. } => "member_email.primary.changed",
            JobRequest::ProfileViewsNotificationMonthly {} => "profile.views.notification.monthly",
            JobRequest::OnboardingSessionAttended { .. } => "onboarding_session.attended",
        }
    }

    /// The queue this job belongs to. Exhaustive: adding a variant without a
    /// queue is a compile error.
    pub fn queue(&self) -> Queue {
        match self {
            JobRequest::SlackMessageAdd { .. }
            | JobRequest::SlackMessageChange { .. }
            | JobRequest::SlackMessageDelete { .. }
            | JobRequest::SlackEmojiChanged { .. }
            | JobRequest::SlackReactionAdded { .. }
            | JobRequest::SlackReactionRemoved { .. }
            | JobRequest::SlackInvite { .. }
            | JobRequest::SlackDeactivate { .. }
            | JobRequest::SlackChatbotMessage { .. }
            | JobRequest::SlackMessageAnswer { .. }
            | JobRequest::SlackSecuredTheBagReminder { .. }
            | JobRequest::SlackBirthdatesUpdate {}
            | JobRequest::SlackChannelArchive { .. }
            | JobRequest::SlackChannelCreate { .. }
            | JobRequest::SlackChannelDelete { .. }
            | JobRequest::SlackChannelRename { .. }
            | JobRequest::SlackChannelUnarchive { .. } => Queue::Slack,

            JobRequest::NotificationEmailSend { .. }
            | JobRequest::NotificationSlackSend { .. }
            | JobRequest::NotificationSmsSend { .. }
            | JobRequest::NotificationSlackEphemeralSend { .. } => Queue::Notification,

            JobRequest::StudentBirthdateDaily {}
            | JobRequest::StudentAnniversaryEmail {}
            | JobRequest::StudentPointsRecurring {}
            | JobRequest::StudentEngagementBackfill { .. }
            | JobRequest::StudentStatusesBackfill {}
            | JobRequest::StudentStatusesNew {} => Queue::Student,

            JobRequest::AirtableRecordUpdateBulk { .. } => Queue::Airtable,
            JobRequest::FeedSlackRecurring {} => Queue::Feed,
            JobRequest::EventRecentSync {} | JobRequest::EventSync { .. } => Queue::Event,
            JobRequest::OpportunityCheckExpired {} => Queue::Opportunity,
            JobRequest::PeerHelpFinishReminder { .. } => Queue::PeerHelp,
            JobRequest::OneTimeCodeExpire { .. } => Queue::OneTimeCode,
            JobRequest::MemberEmailAdded { .. }
            | JobRequest::MemberEmailPrimaryChanged { .. } => Queue::MemberEmail,
            JobRequest::ProfileViewsNotificationMonthly {} => Queue::Profile,
            JobRequest::OnboardingSessionAttended { .. } => Queue::OnboardingSession,
        }
    }

    /// Which backend carries this job. Only the curated real-time set is
    /// immediate; every other declared name defaults to scheduled.
    pub fn delivery(&self) -> Delivery {
        match self {
            JobRequest::SlackMessageAdd { .. }
            | JobRequest::SlackMessageChange { .. }
            | JobRequest::SlackMessageDelete { .. }
            | JobRequest::NotificationEmailSend { .. }
            | JobRequest::NotificationSlackSend { .. }
            | JobRequest::NotificationSmsSend { .. }
            | JobRequest::SlackEmojiChanged { .. }
            | JobRequest::SlackReactionAdded { .. }
            | JobRequest::SlackReactionRemoved { .. }
            | JobRequest::SlackInvite { .. }
            | JobRequest::SlackDeactivate { .. }
            | JobRequest::SlackChatbotMessage { .. }
            | JobRequest::SlackMessageAnswer { .. }
            | JobRequest::SlackSecuredTheBagReminder { .. } => Delivery::Immediate,
            _ => Delivery::Scheduled,
        }
    }
}
