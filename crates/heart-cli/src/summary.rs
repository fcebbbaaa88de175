use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use heart_cli::assess::AssessmentOutcome;
use heart_model::{Categorical, FeatureSchema, NUMERIC_COLUMNS, PatientProfile, RiskLabel};

pub fn print_assessment(profile: &PatientProfile, outcome: &AssessmentOutcome) {
    let o = &outcome.prediction.observation;
    println!("Patient: {}", profile.name);
    println!("Symptoms: {}", profile.symptoms);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Measurement"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, String); 11] = [
        ("Age", o.age.to_string()),
        ("Gender", o.gender.label().to_string()),
        ("Chest pain type", o.chest_pain.as_str().to_string()),
        ("Resting BP (mm Hg)", o.resting_bp.to_string()),
        ("Cholesterol (mg/dL)", o.cholesterol.to_string()),
        ("Fasting BS > 120 mg/dL", o.fasting_bs_value().to_string()),
        ("Resting ECG", o.resting_ecg.as_str().to_string()),
        ("Max HR", o.max_hr.to_string()),
        ("Exercise angina", o.exercise_angina.label().to_string()),
        ("Oldpeak", format!("{:.1}", o.oldpeak)),
        ("ST slope", o.st_slope.as_str().to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("Result")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        risk_cell(outcome.prediction.label),
    ]);
    println!("{table}");

    if let Some(tips) = &outcome.tips {
        println!();
        println!("Heart Health Suggestions:");
        println!("{tips}");
    }
    if let Some(error) = &outcome.advice_error {
        eprintln!("warning: health tips unavailable: {error}");
    }
}

pub fn print_schema(schema: &FeatureSchema) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Kind"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, column) in schema.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index),
            Cell::new(column),
            column_kind_cell(column),
        ]);
    }
    println!("{table}");
}

fn column_kind_cell(column: &str) -> Cell {
    if NUMERIC_COLUMNS.iter().any(|numeric| *numeric == column) {
        return Cell::new("numeric");
    }
    let prefixes = [
        heart_model::Gender::PREFIX,
        heart_model::ChestPainType::PREFIX,
        heart_model::RestingEcg::PREFIX,
        heart_model::ExerciseAngina::PREFIX,
        heart_model::StSlope::PREFIX,
    ];
    match prefixes
        .iter()
        .find(|prefix| column.strip_prefix(**prefix).is_some_and(|rest| rest.starts_with('_')))
    {
        Some(prefix) => Cell::new(format!("one-hot ({prefix})")),
        None => dim_cell("unknown"),
    }
}

fn risk_cell(label: RiskLabel) -> Cell {
    let color = if label.is_high() {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(label.description())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
