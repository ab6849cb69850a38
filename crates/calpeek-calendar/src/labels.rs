//! Display strings for event details, per locale.

use calpeek_core::Locale;

use crate::types::{EventStatus, ResponseStatus};

pub struct Labels {
    pub heading: &'static str,
    pub section_open: &'static str,
    pub section_close: &'static str,

    pub title: &'static str,
    pub description: &'static str,
    pub location: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub creator: &'static str,
    pub organizer: &'static str,
    pub attendees: &'static str,
    pub people_suffix: &'static str,
    pub optional: &'static str,
    pub status: &'static str,
    pub event_id: &'static str,
    pub link: &'static str,
    pub recurrence: &'static str,
    pub series: &'static str,
    pub email: &'static str,

    pub unknown: &'static str,
    pub none: &'static str,
    pub no_title: &'static str,
    pub no_description: &'static str,

    pub accepted: &'static str,
    pub declined: &'static str,
    pub tentative: &'static str,
    pub needs_action: &'static str,

    pub confirmed: &'static str,
    pub tentative_event: &'static str,
    pub cancelled: &'static str,

    pub datetime_format: &'static str,
    pub date_format: &'static str,
}

pub static ENGLISH: Labels = Labels {
    heading: "Event Details",
    section_open: "[",
    section_close: "]",

    title: "Title",
    description: "Description",
    location: "Location",
    start: "Start",
    end: "End",
    created: "Created",
    updated: "Last updated",
    creator: "Creator",
    organizer: "Organizer",
    attendees: "Attendees",
    people_suffix: "",
    optional: "optional",
    status: "Status",
    event_id: "Event ID",
    link: "Link",
    recurrence: "Recurrence",
    series: "Recurring series",
    email: "Email",

    unknown: "unknown",
    none: "none",
    no_title: "(no title)",
    no_description: "(no description)",

    accepted: "participating",
    declined: "not participating",
    tentative: "maybe",
    needs_action: "no response",

    confirmed: "confirmed",
    tentative_event: "tentative",
    cancelled: "cancelled",

    datetime_format: "%Y-%m-%d %H:%M:%S",
    date_format: "%Y-%m-%d",
};

pub static JAPANESE: Labels = Labels {
    heading: "イベント詳細情報",
    section_open: "【",
    section_close: "】",

    title: "タイトル",
    description: "説明",
    location: "場所",
    start: "開始日時",
    end: "終了日時",
    created: "作成日時",
    updated: "最終更新日時",
    creator: "作成者",
    organizer: "主催者",
    attendees: "参加者",
    people_suffix: "名",
    optional: "任意",
    status: "ステータス",
    event_id: "イベントID",
    link: "リンク",
    recurrence: "繰り返し設定",
    series: "繰り返し元イベント",
    email: "Email",

    unknown: "不明",
    none: "なし",
    no_title: "(タイトルなし)",
    no_description: "(説明なし)",

    accepted: "参加",
    declined: "不参加",
    tentative: "未定",
    needs_action: "未回答",

    confirmed: "確定",
    tentative_event: "仮",
    cancelled: "キャンセル",

    datetime_format: "%Y年%m月%d日 %H:%M:%S",
    date_format: "%Y年%m月%d日",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::En => &ENGLISH,
            Locale::Ja => &JAPANESE,
        }
    }

    /// Unrecognized codes are shown as they came.
    pub fn response<'a>(&'a self, status: &'a ResponseStatus) -> &'a str {
        match status {
            ResponseStatus::Accepted => self.accepted,
            ResponseStatus::Declined => self.declined,
            ResponseStatus::Tentative => self.tentative,
            ResponseStatus::NeedsAction => self.needs_action,
            ResponseStatus::Other(code) => code,
        }
    }

    pub fn event_status<'a>(&'a self, status: &'a EventStatus) -> &'a str {
        match status {
            EventStatus::Confirmed => self.confirmed,
            EventStatus::Tentative => self.tentative_event,
            EventStatus::Cancelled => self.cancelled,
            EventStatus::Other(code) => code,
        }
    }
}
