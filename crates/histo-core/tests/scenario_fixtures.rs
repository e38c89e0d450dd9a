use histo_core::{Histogram, HistoErrorCategory, XMode, YMode};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioFixtures {
    masking_cases: Vec<MaskingCase>,
    size_cases: Vec<SizeCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaskingCase {
    id: String,
    y: Vec<Option<f64>>,
    e: Vec<Option<f64>>,
    bin_index: usize,
    weight: f64,
    #[serde(default)]
    expected_y: Option<Vec<f64>>,
    #[serde(default)]
    expected_e: Option<Vec<f64>>,
    #[serde(default)]
    expected_error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizeCase {
    id: String,
    x_mode: XMode,
    x_len: usize,
    y_len: usize,
    e_len: usize,
    valid: bool,
}

fn load_fixtures() -> ScenarioFixtures {
    let path = workspace_root().join("tasks/histogram-scenarios.json");
    let content = fs::read_to_string(&path).expect("scenario fixtures should be readable");
    serde_json::from_str(&content).expect("scenario fixtures should parse")
}

fn nan_for_null(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|value| value.unwrap_or(f64::NAN)).collect()
}

fn category_name(category: HistoErrorCategory) -> &'static str {
    category.as_str()
}

#[test]
fn masking_cases_match_expected_bins() {
    let fixtures = load_fixtures();
    assert!(!fixtures.masking_cases.is_empty());

    for case in fixtures.masking_cases {
        let y = nan_for_null(&case.y);
        let x = (0..=y.len()).map(|i| i as f64).collect::<Vec<_>>();
        let mut histogram = Histogram::from_parts(
            XMode::BinEdges,
            YMode::Counts,
            x,
            y,
            nan_for_null(&case.e),
            None,
        )
        .unwrap_or_else(|error| panic!("{}: histogram should build: {error}", case.id));

        let result = histogram.apply_bin_weight(case.bin_index, case.weight);

        match case.expected_error {
            Some(expected) => {
                let error = result.expect_err(&format!("{}: masking should fail", case.id));
                assert_eq!(category_name(error.category()), expected, "{}", case.id);
            }
            None => {
                result.unwrap_or_else(|error| panic!("{}: masking failed: {error}", case.id));
                assert_eq!(
                    Some(histogram.y().to_vec()),
                    case.expected_y,
                    "{}: Y after masking",
                    case.id
                );
                assert_eq!(
                    Some(histogram.e().to_vec()),
                    case.expected_e,
                    "{}: E after masking",
                    case.id
                );
            }
        }
    }
}

#[test]
fn size_cases_follow_x_mode_rules() {
    for case in load_fixtures().size_cases {
        let result = Histogram::from_parts(
            case.x_mode,
            YMode::Counts,
            vec![0.0; case.x_len],
            vec![1.0; case.y_len],
            vec![1.0; case.e_len],
            None,
        );

        match (case.valid, result) {
            (true, Ok(histogram)) => assert_eq!(histogram.size(), case.y_len, "{}", case.id),
            (false, Err(error)) => assert_eq!(
                error.category(),
                HistoErrorCategory::InvalidArgument,
                "{}",
                case.id
            ),
            (true, Err(error)) => panic!("{}: expected a valid histogram, got {error}", case.id),
            (false, Ok(_)) => panic!("{}: expected a size error", case.id),
        }
    }
}
