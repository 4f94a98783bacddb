/// Badge color bands, highest first. A score lands in the first band whose
/// lower bound it reaches.
const COLOR_BANDS: [(f64, &str); 10] = [
    (95.0, "#2E7D32"),
    (90.0, "#388E3C"),
    (85.0, "#4CAF50"),
    (80.0, "#8BC34A"),
    (75.0, "#CDDC39"),
    (70.0, "#FFEB3B"),
    (65.0, "#FFC107"),
    (60.0, "#FF9800"),
    (55.0, "#FF5722"),
    (50.0, "#D32F2F"),
];

const COLOR_PERFECT: &str = "#1B5E20";
const COLOR_UNDER_50: &str = "#B71C1C";

const LEVEL_BANDS: [(f64, &str); 10] = [
    (95.0, "최고의 매칭"),
    (90.0, "매우 높은 매칭"),
    (85.0, "높은 매칭"),
    (80.0, "상당히 좋은 매칭"),
    (75.0, "좋은 매칭"),
    (70.0, "괜찮은 매칭"),
    (65.0, "보통 이상"),
    (60.0, "보통 매칭"),
    (55.0, "보통 이하"),
    (50.0, "다소 낮은 매칭"),
];

/// Map a matching score (0-100) to its badge color.
///
/// Exactly 100 gets its own shade; anything under 50 (and NaN) is the fixed
/// darkest red.
pub fn score_color(score: f64) -> &'static str {
    if score == 100.0 {
        return COLOR_PERFECT;
    }
    COLOR_BANDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, color)| *color)
        .unwrap_or(COLOR_UNDER_50)
}

/// Human readable label for a matching score, used when the backend sends none
pub fn score_level(score: f64) -> &'static str {
    if !(0.0..=100.0).contains(&score) {
        return "알 수 없음";
    }
    if score == 100.0 {
        return "완벽한 매칭";
    }
    LEVEL_BANDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, level)| *level)
        .unwrap_or("낮은 매칭")
}

/// Score as shown on badges: one decimal place followed by `점`
pub fn format_score(score: f64) -> String {
    format!("{:.1}점", score)
}
