#![allow(clippy::unwrap_used)]

use super::util::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(4.50)), "4.50");
    assert_eq!(format_amount(dec!(0.5)), "0.50");
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_amount(dec!(100)), "100.00");
    assert_eq!(format_amount(dec!(1000)), "1,000.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-20)), "-20.00");
    assert_eq!(format_amount(dec!(-1234.5)), "-1,234.50");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_strings_untouched() {
    assert_eq!(truncate("Coffee", 10), "Coffee");
    assert_eq!(truncate("Coffee", 6), "Coffee");
}

#[test]
fn test_truncate_long_strings() {
    assert_eq!(truncate("Entertainment", 6), "Enter…");
    assert_eq!(truncate("abcdef", 5), "abcd…");
}

#[test]
fn test_truncate_zero_and_multibyte() {
    assert_eq!(truncate("anything", 0), "");
    assert_eq!(truncate("żółć-wydatki", 5), "żółć…");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_and_scrolls() {
    let mut index = 0;
    let mut scroll = 0;
    scroll_down(&mut index, &mut scroll, 10, 5);
    assert_eq!((index, scroll), (1, 0));

    index = 4;
    scroll_down(&mut index, &mut scroll, 10, 5);
    assert_eq!((index, scroll), (5, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let mut index = 9;
    let mut scroll = 5;
    scroll_down(&mut index, &mut scroll, 10, 5);
    assert_eq!((index, scroll), (9, 5));
}

#[test]
fn test_scroll_up_moves_and_scrolls() {
    let mut index = 5;
    let mut scroll = 5;
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (4, 4));

    let mut index = 0;
    let mut scroll = 0;
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_jump_top_and_bottom() {
    let mut index = 7;
    let mut scroll = 3;
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));

    scroll_to_bottom(&mut index, &mut scroll, 0, 5);
    assert_eq!((index, scroll), (19, 15));
}
