//! Pagination validation.
//!
//! Validation criteria:
//! 1. Coverage: slices are contiguous, non-overlapping, cover the whole
//!    text, and carry sequential page indices.
//! 2. Determinism: identical input always produces structurally identical
//!    output.
//! 3. Integration: page slices drive range reads on the piece table the way
//!    a renderer consumes them.

use document_core::{
    FixedAdvance, LayoutError, LayoutOptions, PageSlice, Paginator, PieceTable, layout,
};
use pretty_assertions::assert_eq;

/// 20px-wide lines, 6 lines per page, unit character widths.
fn six_line_options() -> LayoutOptions {
    LayoutOptions {
        page_width: 20.0,
        page_height: 60.0,
        margin_top: 0.0,
        margin_bottom: 0.0,
        margin_left: 0.0,
        margin_right: 0.0,
        line_height: 10.0,
        font: "16px serif".to_string(),
        font_size: 16.0,
    }
}

fn paginate_unit(text: &str, options: &LayoutOptions) -> Vec<PageSlice> {
    Paginator::new(FixedAdvance::unit())
        .paginate(text, options)
        .unwrap()
}

fn assert_covering(pages: &[PageSlice], total: usize) {
    assert!(!pages.is_empty());
    let mut last_end = 0;
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.page_index, i);
        assert_eq!(page.start, last_end);
        assert!(page.end >= page.start);
        last_end = page.end;
    }
    assert_eq!(last_end, total);
}

#[test]
fn test_twenty_line_document_splits_into_pages() {
    // Twenty 10-wide lines against a 6-lines-per-page budget.
    let line = "abcdefghij";
    let text: String = std::iter::repeat(format!("{line}\n")).take(20).collect();

    let pages = paginate_unit(&text, &six_line_options());

    assert!(pages.len() > 1);
    assert_covering(&pages, text.chars().count());

    // 6 lines of 11 chars per full page.
    assert_eq!(pages[0].end, 66);
    assert_eq!(pages[1].start, 66);
}

#[test]
fn test_coverage_across_texts_and_configs() {
    let texts = [
        "hello".to_string(),
        "hello world, this is a longer paragraph that wraps".to_string(),
        "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight".to_string(),
        "你好世界 ".repeat(30),
        "word ".repeat(200),
        "\n\n\n\n".to_string(),
    ];
    let configs = [
        six_line_options(),
        LayoutOptions {
            page_width: 30.0,
            page_height: 20.0,
            ..six_line_options()
        },
        LayoutOptions::default(),
    ];

    for text in &texts {
        for options in &configs {
            let pages = paginate_unit(text, options);
            assert_covering(&pages, text.chars().count());
        }
    }
}

#[test]
fn test_determinism_structural_equality() {
    let text = "the quick brown fox jumps over the lazy dog\n".repeat(25);
    let options = six_line_options();

    let first = paginate_unit(&text, &options);
    let second = paginate_unit(&text, &options);
    assert_eq!(first, second);

    // A fresh paginator (cold cache) agrees as well.
    let third = paginate_unit(&text, &options);
    assert_eq!(first, third);
}

#[test]
fn test_empty_text_yields_single_empty_slice() {
    let pages = layout("", &six_line_options()).unwrap();
    assert_eq!(
        pages,
        vec![PageSlice {
            page_index: 0,
            start: 0,
            end: 0
        }]
    );
}

#[test]
fn test_config_errors_reported_before_any_work() {
    let options = LayoutOptions {
        page_width: 10.0,
        margin_left: 10.0,
        margin_right: 10.0,
        ..six_line_options()
    };
    let err = layout(&"x".repeat(100_000), &options).unwrap_err();
    assert_eq!(err, LayoutError::PageWidthTooSmall);
}

#[test]
fn test_renderer_reads_pages_through_buffer_slices() {
    let line = "paginated text";
    let text: String = std::iter::repeat(format!("{line}\n")).take(20).collect();

    let buffer = PieceTable::new(&text);
    let pages = paginate_unit(&buffer.get_text(), &six_line_options());

    // Reassembling every page's range read reproduces the document.
    let mut rebuilt = String::new();
    for page in &pages {
        rebuilt.push_str(&buffer.get_slice(page.start, page.end).unwrap());
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn test_edit_then_repaginate() {
    let mut buffer = PieceTable::new("alpha beta gamma delta\n".repeat(12).as_str());
    let mut paginator = Paginator::new(FixedAdvance::unit());
    let options = six_line_options();

    let before = paginator.paginate(&buffer.get_text(), &options).unwrap();
    assert_covering(&before, buffer.char_count());

    buffer.insert(6, "inserted ").unwrap();
    buffer.delete(0, 2).unwrap();

    let after = paginator.paginate(&buffer.get_text(), &options).unwrap();
    assert_covering(&after, buffer.char_count());
}
