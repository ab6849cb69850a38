//! Console text for the interactive session.

use calpeek_core::Locale;

pub struct Prompts {
    pub banner: &'static str,
    pub calendars_heading: &'static str,
    pub no_calendars: &'static str,
    pub choose_calendar: &'static str,
    pub selected_calendar: &'static str,
    pub enter_query: &'static str,
    pub results_heading: &'static str,
    pub no_events: &'static str,
    pub choose_event: &'static str,
    pub invalid_selection: &'static str,
    pub invalid_input: &'static str,
    pub error_prefix: &'static str,
    pub exiting: &'static str,
    locale: Locale,
}

static ENGLISH: Prompts = Prompts {
    banner: "Google Calendar event browser",
    calendars_heading: "=== Calendars ===",
    no_calendars: "No calendars available.",
    choose_calendar: "Select a calendar number (default: 1): ",
    selected_calendar: "Selected calendar: ",
    enter_query: "Search keyword (leave empty to list everything): ",
    results_heading: "=== Search results ===",
    no_events: "No matching events found.",
    choose_event: "Select an event number for details (0 to exit): ",
    invalid_selection: "Invalid selection.",
    invalid_input: "Invalid input.",
    error_prefix: "An error occurred: ",
    exiting: "Exiting.",
    locale: Locale::En,
};

static JAPANESE: Prompts = Prompts {
    banner: "Google Calendar イベント情報取得ツール",
    calendars_heading: "=== カレンダー一覧 ===",
    no_calendars: "利用可能なカレンダーがありません。",
    choose_calendar: "カレンダー番号を選択してください (デフォルト: 1): ",
    selected_calendar: "選択されたカレンダー: ",
    enter_query: "検索キーワードを入力 (空欄で全件表示): ",
    results_heading: "=== イベント検索結果 ===",
    no_events: "該当するイベントが見つかりませんでした。",
    choose_event: "詳細を表示するイベント番号を選択 (0で終了): ",
    invalid_selection: "無効な選択です。",
    invalid_input: "無効な入力です。",
    error_prefix: "エラーが発生しました: ",
    exiting: "終了します。",
    locale: Locale::Ja,
};

impl Prompts {
    pub fn for_locale(locale: Locale) -> &'static Prompts {
        match locale {
            Locale::En => &ENGLISH,
            Locale::Ja => &JAPANESE,
        }
    }

    pub fn days_back(&self, default: u32) -> String {
        match self.locale {
            Locale::En => format!("How many days back? (default: {}): ", default),
            Locale::Ja => format!("過去何日間を検索？ (デフォルト: {}): ", default),
        }
    }

    pub fn days_forward(&self, default: u32) -> String {
        match self.locale {
            Locale::En => format!("How many days ahead? (default: {}): ", default),
            Locale::Ja => format!("未来何日間を検索？ (デフォルト: {}): ", default),
        }
    }

    pub fn search_range(&self, days_back: u32, days_forward: u32) -> String {
        match self.locale {
            Locale::En => format!(
                "Range: {} days back to {} days ahead",
                days_back, days_forward
            ),
            Locale::Ja => format!("検索範囲: 過去{}日 〜 未来{}日", days_back, days_forward),
        }
    }

    pub fn keyword(&self, query: &str) -> String {
        match self.locale {
            Locale::En => format!("Keyword: {}", query),
            Locale::Ja => format!("検索キーワード: {}", query),
        }
    }
}
