//! Translation of avalanche.org products into provider-neutral models

use super::nac::{ForecastResponse, MapLayerFeature, MediaUrl, ProblemResponse};
use crate::models::{
    AvalancheCenter, AvalancheForecast, AvalancheProblem, AvalancheSize, DangerLevel, DangerRating,
    ForecastZone, Likelihood,
};

/// Normalize a free-text likelihood label such as `very_likely` or
/// `Almost Certain`
#[must_use]
pub fn parse_likelihood(label: &str) -> Likelihood {
    let normalized: String = label
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect();

    match normalized.as_str() {
        "unlikely" => Likelihood::Unlikely,
        "possible" => Likelihood::Possible,
        "likely" => Likelihood::Likely,
        "verylikely" => Likelihood::VeryLikely,
        "almostcertain" => Likelihood::AlmostCertain,
        _ => Likelihood::Unknown,
    }
}

/// Min/max over the parseable size labels; `{0, 0}` when none parse
#[must_use]
pub fn parse_size(sizes: &[String]) -> AvalancheSize {
    sizes
        .iter()
        .filter_map(|size| size.trim().parse::<f64>().ok())
        .filter(|size| size.is_finite())
        .fold(None, |range: Option<AvalancheSize>, size| {
            Some(match range {
                None => AvalancheSize { min: size, max: size },
                Some(range) => AvalancheSize {
                    min: range.min.min(size),
                    max: range.max.max(size),
                },
            })
        })
        .unwrap_or_default()
}

/// Prefer the original-size image, fall back to a bare string URL
#[must_use]
pub fn media_url(url: Option<&MediaUrl>) -> Option<String> {
    match url? {
        MediaUrl::Sizes(sizes) => sizes.original.clone().filter(|url| !url.is_empty()),
        MediaUrl::Plain(url) if !url.is_empty() => Some(url.clone()),
        _ => None,
    }
}

fn map_problem(problem: &ProblemResponse) -> AvalancheProblem {
    AvalancheProblem {
        name: problem.name.clone(),
        rank: problem.rank,
        likelihood: problem
            .likelihood
            .as_deref()
            .map(parse_likelihood)
            .unwrap_or_default(),
        discussion: problem.discussion.clone().unwrap_or_default(),
        location: problem.location.clone(),
        size: parse_size(&problem.size),
        media_url: media_url(problem.media.as_ref().and_then(|media| media.url.as_ref())),
    }
}

/// Combine the matched zone feature with its forecast product
#[must_use]
pub fn map_forecast_response(zone: &MapLayerFeature, response: &ForecastResponse) -> AvalancheForecast {
    let mut forecast_zone = ForecastZone {
        id: zone.id,
        name: zone.properties.name.clone(),
        state: String::new(),
        url: zone.properties.link.clone(),
    };
    if let Some(product_zone) = response.forecast_zone.iter().find(|z| z.id == zone.id) {
        forecast_zone.state = product_zone.state.clone();
        if !product_zone.url.is_empty() {
            forecast_zone.url = product_zone.url.clone();
        }
    }

    let center = &response.avalanche_center;

    AvalancheForecast {
        zone: forecast_zone,
        center: AvalancheCenter {
            id: center.id.clone(),
            name: center.name.clone(),
            url: center.url.clone(),
            city: center.city.clone(),
            state: center.state.clone(),
        },
        published_time: response.published_time,
        expires_time: response.expires_time,
        author: response.author.clone().unwrap_or_default(),
        bottom_line: response.bottom_line.clone().unwrap_or_default(),
        hazard_discussion: response.hazard_discussion.clone().unwrap_or_default(),
        danger_ratings: response
            .danger
            .iter()
            .map(|danger| DangerRating {
                valid_day: danger.valid_day.clone(),
                lower: DangerLevel::from_level(danger.lower.unwrap_or_default()),
                middle: DangerLevel::from_level(danger.middle.unwrap_or_default()),
                upper: DangerLevel::from_level(danger.upper.unwrap_or_default()),
            })
            .collect(),
        problems: response.forecast_avalanche_problems.iter().map(map_problem).collect(),
        forecast_url: zone.properties.link.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("unlikely", Likelihood::Unlikely)]
    #[case("Possible", Likelihood::Possible)]
    #[case(" likely ", Likelihood::Likely)]
    #[case("very_likely", Likelihood::VeryLikely)]
    #[case("Very Likely", Likelihood::VeryLikely)]
    #[case("almost certain", Likelihood::AlmostCertain)]
    #[case("ALMOST_CERTAIN", Likelihood::AlmostCertain)]
    #[case("certain", Likelihood::Unknown)]
    #[case("", Likelihood::Unknown)]
    fn test_parse_likelihood(#[case] label: &str, #[case] expected: Likelihood) {
        assert_eq!(parse_likelihood(label), expected);
    }

    #[rstest]
    #[case(&["1.5", "2.5"], 1.5, 2.5)]
    #[case(&["2"], 2.0, 2.0)]
    #[case(&["3", "1", "2"], 1.0, 3.0)]
    #[case(&["large", "2.5"], 2.5, 2.5)]
    #[case(&["1", "D2", "3.5"], 1.0, 3.5)]
    #[case(&["n/a"], 0.0, 0.0)]
    #[case(&[], 0.0, 0.0)]
    fn test_parse_size(#[case] sizes: &[&str], #[case] min: f64, #[case] max: f64) {
        let sizes: Vec<String> = sizes.iter().map(ToString::to_string).collect();
        assert_eq!(parse_size(&sizes), AvalancheSize { min, max });
    }

    #[test]
    fn test_media_url_variants() {
        let sizes: MediaUrl = serde_json::from_value(json!({
            "large": "https://img.example/large.jpg",
            "original": "https://img.example/original.jpg"
        }))
        .unwrap();
        assert_eq!(
            media_url(Some(&sizes)).as_deref(),
            Some("https://img.example/original.jpg")
        );

        let no_original: MediaUrl =
            serde_json::from_value(json!({"thumbnail": "https://img.example/t.jpg"})).unwrap();
        assert_eq!(media_url(Some(&no_original)), None);

        let plain = MediaUrl::Plain("https://img.example/plain.jpg".to_string());
        assert_eq!(media_url(Some(&plain)).as_deref(), Some("https://img.example/plain.jpg"));

        assert_eq!(media_url(Some(&MediaUrl::Other(json!(3)))), None);
        assert_eq!(media_url(None), None);
    }

    fn zone() -> MapLayerFeature {
        serde_json::from_value(json!({
            "id": 2702,
            "properties": {
                "name": "Vail & Summit County",
                "center_id": "CAIC",
                "link": "https://avalanche.state.co.us/zone/vail"
            },
            "geometry": {"type": "Polygon", "coordinates": [[[-106.4, 39.4], [-106.0, 39.4], [-106.0, 39.7], [-106.4, 39.4]]]}
        }))
        .unwrap()
    }

    fn product() -> ForecastResponse {
        serde_json::from_value(json!({
            "published_time": "2025-01-15T00:00:00+00:00",
            "expires_time": "2025-01-16T00:00:00+00:00",
            "author": "Forecaster",
            "bottom_line": "<p>Dangerous conditions</p>",
            "hazard_discussion": "<p>Details</p>",
            "avalanche_center": {
                "id": "CAIC",
                "name": "Colorado Avalanche Information Center",
                "url": "https://avalanche.state.co.us",
                "city": "Boulder",
                "state": "CO"
            },
            "danger": [
                {"lower": 2, "middle": 3, "upper": 3, "valid_day": "current"},
                {"lower": 1, "middle": 2, "upper": 7, "valid_day": "tomorrow"}
            ],
            "forecast_avalanche_problems": [
                {
                    "name": "Persistent Slab",
                    "rank": 1,
                    "likelihood": "very_likely",
                    "discussion": "<p>Buried weak layer</p>",
                    "location": ["north upper", "east middle"],
                    "size": ["1.5", "3"],
                    "media": {"url": {"original": "https://img.example/slab.jpg"}}
                },
                {
                    "name": "Wind Slab",
                    "rank": 2,
                    "likelihood": "possible",
                    "size": ["1"],
                    "media": {"url": "https://img.example/wind.jpg"}
                }
            ],
            "forecast_zone": [
                {"id": 1, "name": "Other", "url": "https://other", "state": "UT"},
                {"id": 2702, "name": "Vail & Summit County", "url": "", "state": "CO"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_map_forecast_response() {
        let forecast = map_forecast_response(&zone(), &product());

        assert_eq!(forecast.zone.id, 2702);
        assert_eq!(forecast.zone.name, "Vail & Summit County");
        assert_eq!(forecast.zone.state, "CO");
        // empty product url keeps the map-layer link
        assert_eq!(forecast.zone.url, "https://avalanche.state.co.us/zone/vail");
        assert_eq!(forecast.forecast_url, "https://avalanche.state.co.us/zone/vail");
        assert_eq!(forecast.center.id, "CAIC");
        assert_eq!(forecast.center.city, "Boulder");
        assert_eq!(forecast.author, "Forecaster");
        assert!(forecast.published_time.is_some());

        assert_eq!(forecast.danger_ratings.len(), 2);
        assert_eq!(forecast.danger_ratings[0].middle, DangerLevel::Considerable);
        assert_eq!(forecast.danger_ratings[1].upper, DangerLevel::NoRating);

        let slab = &forecast.problems[0];
        assert_eq!(slab.likelihood, Likelihood::VeryLikely);
        assert_eq!(slab.size, AvalancheSize { min: 1.5, max: 3.0 });
        assert_eq!(slab.location, vec!["north upper", "east middle"]);
        assert_eq!(slab.media_url.as_deref(), Some("https://img.example/slab.jpg"));

        let wind = &forecast.problems[1];
        assert_eq!(wind.rank, 2);
        assert_eq!(wind.discussion, "");
        assert_eq!(wind.media_url.as_deref(), Some("https://img.example/wind.jpg"));
    }

    #[test]
    fn test_zone_url_override_from_product() {
        let mut product = product();
        product.forecast_zone[1].url = "https://avalanche.state.co.us/vail-summit".to_string();

        let forecast = map_forecast_response(&zone(), &product);

        assert_eq!(forecast.zone.url, "https://avalanche.state.co.us/vail-summit");
        assert_eq!(forecast.forecast_url, "https://avalanche.state.co.us/zone/vail");
    }

    #[test]
    fn test_missing_product_zone_leaves_state_empty() {
        let mut product = product();
        product.forecast_zone.clear();

        let forecast = map_forecast_response(&zone(), &product);
        assert_eq!(forecast.zone.state, "");
    }
}
