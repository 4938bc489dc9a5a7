// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Query string to [`FetchConfiguration`] decoding.
//!
//! Parameter names are case-sensitive. Unknown parameters are ignored and,
//! when a parameter appears more than once, the last occurrence wins.
//! Parameters are validated in a fixed order (`localIdentifier`,
//! `targetSize`, `deliveryMode`, `resizeMode`, `isNetworkAccessAllowed`,
//! `contentMode`) and the first failure is reported.

use percent_encoding::percent_decode_str;
use phasset_core::request::params::{
    CONTENT_MODE, DELIVERY_MODE, LOCAL_IDENTIFIER, NETWORK_ACCESS_ALLOWED, RESIZE_MODE,
    TARGET_SIZE,
};
use phasset_core::request::MAXIMUM_SIZE_SENTINEL;
use phasset_core::{
    ContentMode, DeliveryMode, FetchConfiguration, ParseError, ResizeMode, Size, TargetSize,
};
use std::collections::HashMap;
use url::Url;

/// Decoded query parameters of a URL, last occurrence wins.
///
/// Items without a `=` carry no value and are skipped, as are items whose
/// name or value does not decode to UTF-8. Names and values are
/// percent-decoded; `+` is kept literally.
pub fn query_parameters(url: &Url) -> HashMap<String, String> {
    raw_query(url)
        .into_iter()
        .filter_map(|(name, value)| Some((name, decode_component(value)?)))
        .collect()
}

/// Decodes the query of `url` into a [`FetchConfiguration`].
///
/// A known parameter whose value is not valid percent-encoded UTF-8 is
/// reported as [`ParseError::InvalidParameterFormat`].
pub fn parse(url: &Url) -> Result<FetchConfiguration, ParseError> {
    let raw = raw_query(url);
    decode_with(|name| match raw.get(name) {
        Some(value) => decode_component(value)
            .map(Some)
            .ok_or(ParseError::InvalidParameterFormat(name)),
        None => Ok(None),
    })
}

/// Decodes already extracted query parameters into a [`FetchConfiguration`].
pub fn decode(params: &HashMap<String, String>) -> Result<FetchConfiguration, ParseError> {
    decode_with(|name| Ok(params.get(name).cloned()))
}

fn decode_with<F>(param: F) -> Result<FetchConfiguration, ParseError>
where
    F: Fn(&'static str) -> Result<Option<String>, ParseError>,
{
    // Each parameter is fetched, decoded and validated in turn; the order is observable.
    let local_identifier = param(LOCAL_IDENTIFIER)?
        .filter(|value| !value.is_empty())
        .ok_or(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER))?;

    let mut configuration = FetchConfiguration::new(local_identifier);

    if let Some(raw) = param(TARGET_SIZE)? {
        configuration.target_size = Some(parse_target_size(&raw)?);
    }
    if let Some(mode) = parse_mode(&param, DELIVERY_MODE, DeliveryMode::from_raw)? {
        configuration.delivery_mode = mode;
    }
    if let Some(mode) = parse_mode(&param, RESIZE_MODE, ResizeMode::from_raw)? {
        configuration.resize_mode = mode;
    }
    if let Some(raw) = param(NETWORK_ACCESS_ALLOWED)? {
        configuration.network_access_allowed = parse_flag(&raw);
    }
    if let Some(mode) = parse_mode(&param, CONTENT_MODE, ContentMode::from_raw)? {
        configuration.content_mode = mode;
    }

    log::trace!(
        "Decoded fetch configuration for asset '{}'",
        configuration.local_identifier
    );
    Ok(configuration)
}

/// Parses `"<width>x<height>"` or the maximum-size sentinel.
///
/// The separator is matched case-insensitively. Both components must be
/// finite and non-negative.
pub fn parse_target_size(raw: &str) -> Result<TargetSize, ParseError> {
    if raw.eq_ignore_ascii_case(MAXIMUM_SIZE_SENTINEL) {
        return Ok(TargetSize::Maximum);
    }

    let invalid = ParseError::InvalidParameterFormat(TARGET_SIZE);
    let lowered = raw.to_ascii_lowercase();
    let mut components = lowered.split('x');
    match (components.next(), components.next(), components.next()) {
        (Some(width), Some(height), None) => {
            let width = parse_dimension(width).ok_or(invalid.clone())?;
            let height = parse_dimension(height).ok_or(invalid)?;
            Ok(TargetSize::Explicit(Size::new(width, height)))
        }
        _ => Err(invalid),
    }
}

/// Lenient boolean: `"true"` in any case is true, everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

fn parse_dimension(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| is_valid_dimension(*value))
}

/// Whether `value` is accepted as a `targetSize` component: finite and non-negative.
pub(crate) fn is_valid_dimension(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn parse_mode<T, F>(
    param: &F,
    name: &'static str,
    from_raw: fn(i64) -> Option<T>,
) -> Result<Option<T>, ParseError>
where
    F: Fn(&'static str) -> Result<Option<String>, ParseError>,
{
    let Some(raw) = param(name)? else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .ok()
        .and_then(from_raw)
        .map(Some)
        .ok_or(ParseError::InvalidParameterFormat(name))
}

/// Query items with decoded names and still-encoded values, last occurrence wins.
fn raw_query(url: &Url) -> HashMap<String, &str> {
    let Some(query) = url.query() else {
        return HashMap::new();
    };

    query
        .split('&')
        .filter_map(|item| item.split_once('='))
        .filter_map(|(name, value)| Some((decode_component(name)?, value)))
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn query_parameters_keep_last_duplicate() {
        let params = query_parameters(&url("phasset://?a=1&b=2&a=3"));
        assert_eq!(params.get("a").map(String::as_str), Some("3"));
        assert_eq!(params.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn query_parameters_skip_valueless_items_and_decode() {
        let params = query_parameters(&url("phasset://?flag&id=A%2FB%20C&plus=a+b&empty="));
        assert!(!params.contains_key("flag"));
        assert_eq!(params.get("id").map(String::as_str), Some("A/B C"));
        assert_eq!(params.get("plus").map(String::as_str), Some("a+b"));
        assert_eq!(params.get("empty").map(String::as_str), Some(""));
    }

    #[test]
    fn invalid_utf8_identifier_is_rejected() {
        for raw in ["phasset://?localIdentifier=%FF", "phasset://?localIdentifier=%FE"] {
            assert_eq!(
                parse(&url(raw)),
                Err(ParseError::InvalidParameterFormat("localIdentifier")),
                "{raw}"
            );
        }
    }

    #[test]
    fn invalid_utf8_is_reported_in_validation_order() {
        assert_eq!(
            parse(&url("phasset://?localIdentifier=A&targetSize=%C3&deliveryMode=9")),
            Err(ParseError::InvalidParameterFormat("targetSize"))
        );
        assert_eq!(
            parse(&url("phasset://?targetSize=%C3")),
            Err(ParseError::MissingRequiredParameter("localIdentifier"))
        );
    }

    #[test]
    fn undecodable_unknown_parameters_are_ignored() {
        let configuration = parse(&url("phasset://?localIdentifier=A&extra=%FF&%FF=1")).unwrap();
        assert_eq!(configuration.local_identifier, "A");

        let params = query_parameters(&url("phasset://?id=%FF&ok=%C3%A9"));
        assert!(!params.contains_key("id"));
        assert_eq!(params.get("ok").map(String::as_str), Some("é"));
    }

    #[test]
    fn query_parameters_without_query_is_empty() {
        assert!(query_parameters(&url("phasset://")).is_empty());
    }

    #[test]
    fn target_size_variants() {
        assert_eq!(
            parse_target_size("100x200"),
            Ok(TargetSize::Explicit(Size::new(100.0, 200.0)))
        );
        assert_eq!(
            parse_target_size("100X200"),
            Ok(TargetSize::Explicit(Size::new(100.0, 200.0)))
        );
        assert_eq!(
            parse_target_size("12.5x0"),
            Ok(TargetSize::Explicit(Size::new(12.5, 0.0)))
        );
        assert_eq!(
            parse_target_size("PHImageManagerMaximumSize"),
            Ok(TargetSize::Maximum)
        );
        assert_eq!(
            parse_target_size("phimagemanagermaximumsize"),
            Ok(TargetSize::Maximum)
        );
    }

    #[test]
    fn malformed_target_sizes_are_rejected() {
        for raw in [
            "", "100", "100x", "x100", "100x200x300", "axb", "-1x10", "10x-1", "infx10",
            "nanx10", "100 x 200",
        ] {
            assert_eq!(
                parse_target_size(raw),
                Err(ParseError::InvalidParameterFormat(TARGET_SIZE)),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn flag_is_lenient() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn validation_order_reports_first_failure() {
        let configuration = parse(&url(
            "phasset://?localIdentifier=A&deliveryMode=9&resizeMode=9",
        ));
        assert_eq!(
            configuration,
            Err(ParseError::InvalidParameterFormat(DELIVERY_MODE))
        );

        let configuration = parse(&url(
            "phasset://?localIdentifier=A&contentMode=9&targetSize=bad",
        ));
        assert_eq!(
            configuration,
            Err(ParseError::InvalidParameterFormat(TARGET_SIZE))
        );
    }

    #[test]
    fn identifier_is_checked_before_anything_else() {
        assert_eq!(
            parse(&url("phasset://?targetSize=bad")),
            Err(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER))
        );
    }
}
