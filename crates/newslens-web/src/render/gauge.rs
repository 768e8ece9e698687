use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

const RADIUS: f64 = 54.0;

/// Circular trust-score gauge.
pub fn render_trust_gauge(score: f64) -> String {
    let value = clamp_percent(score);
    let band = ScoreBand::from_score(value);
    let radius = RADIUS;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let offset = circumference * (1.0 - value / 100.0);

    format!(
        r##"<div class="trust-gauge {class}">
    <svg viewBox="0 0 120 120" width="160" height="160" role="img" aria-label="Trust score {value:.0} out of 100">
        <circle cx="60" cy="60" r="{radius}" fill="none" stroke="#e5e7eb" stroke-width="10"/>
        <circle cx="60" cy="60" r="{radius}" fill="none" stroke="{color}" stroke-width="10" stroke-linecap="round"
                stroke-dasharray="{circumference:.2}" stroke-dashoffset="{offset:.2}" transform="rotate(-90 60 60)"/>
        <text x="60" y="66" text-anchor="middle" class="gauge-value">{value:.0}</text>
    </svg>
    <div class="gauge-label">{label}</div>
</div>"##,
        class = band.css_class(),
        color = band.color(),
        label = band.trust_label(),
    )
}
