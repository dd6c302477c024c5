//! Message formatting for human-facing channels

use std::fmt::Write;

use crate::models::{Level, Slot};
use crate::notifications::Notice;

const SEPARATOR: &str = "━━━━━━━━━━━━━━";

/// Slots of one level, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGroup<'a> {
    pub level: Level,
    pub slots: Vec<&'a Slot>,
}

/// Group slots by level
///
/// Groups appear in the order their level is first seen; slots keep their
/// relative order within a group.
pub fn group_by_level(slots: &[Slot]) -> Vec<LevelGroup<'_>> {
    let mut groups: Vec<LevelGroup<'_>> = Vec::new();
    for slot in slots {
        match groups.iter_mut().find(|g| g.level == slot.level) {
            Some(group) => group.slots.push(slot),
            None => groups.push(LevelGroup {
                level: slot.level,
                slots: vec![slot],
            }),
        }
    }
    groups
}

/// Telegram `parse_mode=HTML` message for a notice
pub fn format_telegram_message(notice: &Notice) -> String {
    let mut message = String::from("🏄 <b>웨이브파크 티켓 예매 가능!</b>\n");

    for group in group_by_level(&notice.tickets) {
        let _ = write!(message, "\n<b>[{}]</b>\n", group.level.label());
        for slot in group.slots {
            let _ = writeln!(message, "📅 날짜: {}", html_escape::encode_text(&slot.date));
            let _ = writeln!(message, "⏰ 시간: {}", html_escape::encode_text(&slot.time));
            let _ = writeln!(
                message,
                "🎫 잔여: 좌측 {} / 우측 {}",
                slot.left_seats, slot.right_seats
            );
            let _ = writeln!(message, "{SEPARATOR}");
        }
    }

    let _ = write!(
        message,
        "\n🔗 <a href=\"{}\">지금 바로 예매하기</a>",
        html_escape::encode_double_quoted_attribute(&notice.page_url)
    );

    message
}

/// One line per slot, for logs and dry runs
pub fn format_summary(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|s| {
            format!(
                "{} {} {} 좌{}/우{} (총 {})",
                s.date,
                s.time,
                s.level.label(),
                s.left_seats,
                s.right_seats,
                s.total_seats
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
