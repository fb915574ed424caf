//! Placement properties: every question placed exactly once, and no two
//! blocks overlapping within a column.

use std::collections::HashMap;

use answergrid_core::{
    standard_palette, AnswerOption, BrushTool, GridSnapshot, OptionId, PaintColor, Question,
};
use answergrid_layout::{DocumentPlan, LayoutEngine, PlacementRegion};

fn red() -> PaintColor {
    PaintColor::new("Red", "#FF0000")
}

fn multiple(text: &str, option_text: &str, option_count: usize) -> Question {
    let palette = standard_palette();
    let options: Vec<AnswerOption> = (0..option_count)
        .map(|i| AnswerOption::new(option_text, format!("{text}-{i}")))
        .collect();
    let option_colors: HashMap<OptionId, PaintColor> = options
        .iter()
        .zip(palette.iter().cycle())
        .map(|(o, c)| (o.id, c.clone()))
        .collect();
    let correct = options[0].id;
    Question::multiple(text, options, option_colors, correct)
}

/// Mixed question lists of growing size and verbosity.
fn sample_lists() -> Vec<Vec<Question>> {
    let wordy = "an option description that wraps over several lines when the column is narrow";
    let mut lists = vec![Vec::new()];

    lists.push(vec![Question::single("2 + 2?", "4", Some(red()))]);

    lists.push(vec![
        Question::single("short", "1", Some(red())),
        multiple("pick one", wordy, 4),
        Question::single("no color assigned yet", "9", None),
        multiple("pick another", wordy, 6),
    ]);

    let mut large = Vec::new();
    for i in 0..35 {
        if i % 3 == 0 {
            large.push(multiple(&format!("multi {i}"), wordy, 4));
        } else {
            large.push(Question::single(
                format!("single question number {i} with a fairly long text body"),
                format!("{i}"),
                Some(red()),
            ));
        }
    }
    lists.push(large);

    lists
}

fn check_completeness(plan: &DocumentPlan, question_count: usize) {
    assert_eq!(plan.placements.len(), question_count);
    // Each question exactly once, in list order.
    for (i, placement) in plan.placements.iter().enumerate() {
        assert_eq!(placement.question_index, i);
    }
}

fn check_non_overlap(plan: &DocumentPlan) {
    let mut by_column: HashMap<(usize, PlacementRegion, usize), Vec<(f32, f32)>> = HashMap::new();
    for placement in &plan.placements {
        by_column
            .entry((placement.page, placement.region, placement.column))
            .or_default()
            .push((placement.y, placement.height));
    }
    for ((page, region, column), mut ranges) in by_column {
        ranges.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite"));
        for pair in ranges.windows(2) {
            let (y0, h0) = pair[0];
            let (y1, _) = pair[1];
            assert!(
                y1 >= y0 + h0 - 1e-4,
                "overlap on page {page} {region:?} column {column}: \
                 block at {y0} height {h0} vs block at {y1}"
            );
        }
    }
}

#[test]
fn placements_complete_and_disjoint() {
    for grid_size in [10usize, 15, 20] {
        let grid = GridSnapshot::empty(grid_size);
        for questions in sample_lists() {
            let plan = LayoutEngine::with_defaults().plan("Review", &grid, &questions);
            check_completeness(&plan, questions.len());
            check_non_overlap(&plan);
            assert!(!plan.pages.is_empty());
        }
    }
}

#[test]
fn edge_painted_single_question_scenario() {
    // 15x15 grid, one single question (answer "A", red), painted with a 2x2
    // brush anchored at the bottom-right corner cell: the stamp clips to
    // that one cell, and the plan labels it with the literal token.
    let questions = vec![Question::single("the letter?", "A", Some(red()))];
    let grid = GridSnapshot::empty(15);
    let corner = grid.index_of(14, 14);
    let painted = grid.paint(
        corner,
        2,
        &BrushTool::Paint {
            answer: "A".to_string(),
            color: red(),
        },
    );
    assert_eq!(painted.cell(corner), Some("A"));
    assert_eq!(
        painted.cells().iter().filter(|c| !c.is_empty()).count(),
        1
    );

    let bindings = answergrid_core::resolve_bindings(&questions);
    assert_eq!(bindings.color_of("A"), Some(&red()));
    assert_eq!(bindings.ref_of("A"), Some("A"));

    let plan = LayoutEngine::with_defaults().plan("Letters", &painted, &questions);
    let cell_labels = plan.pages[0]
        .ops
        .iter()
        .filter(|op| matches!(
            op,
            answergrid_layout::DrawOp::Text { text, font_pt, .. }
                if text == "A" && *font_pt <= 10.0
        ))
        .count();
    assert_eq!(cell_labels, 1);
}

#[test]
fn plan_serializes_for_external_backends() {
    let questions = vec![
        Question::single("2 + 2?", "4", Some(red())),
        multiple("pick", "option", 4),
    ];
    let grid = GridSnapshot::empty(10);
    let plan = LayoutEngine::with_defaults().plan("Export", &grid, &questions);

    let json = serde_json::to_string(&plan).expect("serialize");
    let back: DocumentPlan = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, plan);
}
