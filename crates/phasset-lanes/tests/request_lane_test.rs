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

use phasset_core::request::params::{DELIVERY_MODE, LOCAL_IDENTIFIER, RESIZE_MODE, TARGET_SIZE};
use phasset_core::{
    ContentMode, DeliveryMode, FetchConfiguration, ParseError, ResizeMode, Size, TargetSize, Url,
};
use phasset_lanes::{codec, ImageSourceOptions, SchemeDispatcher};

fn parse(raw: &str) -> Result<FetchConfiguration, ParseError> {
    codec::parse(&Url::parse(raw).expect("test URIs are valid"))
}

#[test]
fn identifier_only_uses_defaults() {
    let configuration = parse("phasset://?localIdentifier=ABC123").unwrap();

    assert_eq!(configuration.local_identifier, "ABC123");
    assert_eq!(configuration.target_size, None);
    assert_eq!(configuration.resize_mode, ResizeMode::None);
    assert_eq!(configuration.delivery_mode, DeliveryMode::Opportunistic);
    assert_eq!(configuration.content_mode, ContentMode::AspectFit);
    assert!(!configuration.network_access_allowed);
}

#[test]
fn full_query_is_decoded() {
    let configuration = parse(
        "phasset://?localIdentifier=ABC123&targetSize=100x200&resizeMode=2\
         &deliveryMode=1&contentMode=1&isNetworkAccessAllowed=TRUE",
    )
    .unwrap();

    assert_eq!(
        configuration.target_size,
        Some(TargetSize::Explicit(Size::new(100.0, 200.0)))
    );
    assert_eq!(configuration.resize_mode, ResizeMode::Exact);
    assert_eq!(configuration.delivery_mode, DeliveryMode::HighQualityFormat);
    assert_eq!(configuration.content_mode, ContentMode::AspectFill);
    assert!(configuration.network_access_allowed);
}

#[test]
fn maximum_size_sentinel() {
    let configuration =
        parse("phasset://?localIdentifier=ABC123&targetSize=PHImageManagerMaximumSize").unwrap();
    assert_eq!(configuration.target_size, Some(TargetSize::Maximum));
}

#[test]
fn missing_or_empty_identifier() {
    assert_eq!(
        parse("phasset://?targetSize=10x10"),
        Err(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER))
    );
    assert_eq!(
        parse("phasset://?localIdentifier="),
        Err(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER))
    );
    assert_eq!(
        parse("phasset://"),
        Err(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER))
    );
}

#[test]
fn out_of_range_and_non_numeric_modes() {
    assert_eq!(
        parse("phasset://?localIdentifier=A&resizeMode=3"),
        Err(ParseError::InvalidParameterFormat(RESIZE_MODE))
    );
    assert_eq!(
        parse("phasset://?localIdentifier=A&deliveryMode=fast"),
        Err(ParseError::InvalidParameterFormat(DELIVERY_MODE))
    );
    assert_eq!(
        parse("phasset://?localIdentifier=A&targetSize=100"),
        Err(ParseError::InvalidParameterFormat(TARGET_SIZE))
    );
}

#[test]
fn unknown_parameters_are_ignored() {
    let configuration = parse("phasset://?localIdentifier=A&cache=no&foo=bar").unwrap();
    assert_eq!(configuration, FetchConfiguration::new("A"));
}

#[test]
fn non_true_flags_are_false() {
    for raw in ["1", "yes", "false", "on"] {
        let configuration =
            parse(&format!("phasset://?localIdentifier=A&isNetworkAccessAllowed={raw}")).unwrap();
        assert!(!configuration.network_access_allowed, "{raw} should be false");
    }
}

#[test]
fn built_uris_are_handled_and_decode_to_the_same_options() {
    let dispatcher = SchemeDispatcher::default();
    let options = ImageSourceOptions::new("ED7AC36B-A150-4C38-BB8C-B6D696F4F2ED/L0/001")
        .with_target_size(TargetSize::Explicit(Size::new(320.0, 240.5)))
        .with_resize_mode(ResizeMode::Fast)
        .with_delivery_mode(DeliveryMode::FastFormat)
        .with_content_mode(ContentMode::AspectFill)
        .with_network_access(true);

    let url = options.to_url().unwrap();
    assert!(dispatcher.can_handle(&url));

    let configuration = codec::parse(&url).unwrap();
    assert_eq!(configuration.local_identifier, options.local_identifier);
    assert_eq!(configuration.target_size, options.target_size);
    assert_eq!(configuration.resize_mode, ResizeMode::Fast);
    assert_eq!(configuration.delivery_mode, DeliveryMode::FastFormat);
    assert_eq!(configuration.content_mode, ContentMode::AspectFill);
    assert!(configuration.network_access_allowed);
}

#[test]
fn edge_sizes_are_refused_by_the_builder_or_accepted_by_the_codec() {
    let accepted = [
        Size::ZERO,
        Size::new(-0.0, 1.0),
        Size::new(0.000_000_1, 3.25),
        Size::new(1e21, f64::MAX),
    ];
    for size in accepted {
        let options = ImageSourceOptions::new("A").with_target_size(TargetSize::Explicit(size));
        let configuration = codec::parse(&options.to_url().unwrap()).unwrap();
        assert_eq!(configuration.target_size, Some(TargetSize::Explicit(size)), "{size:?}");
    }

    let refused = [
        Size::new(-1.0, 2.0),
        Size::new(f64::NAN, 2.0),
        Size::new(f64::INFINITY, 2.0),
        Size::new(2.0, f64::NEG_INFINITY),
    ];
    for size in refused {
        let options = ImageSourceOptions::new("A").with_target_size(TargetSize::Explicit(size));
        assert_eq!(
            options.to_uri(),
            Err(ParseError::InvalidParameterFormat(TARGET_SIZE)),
            "{size:?}"
        );
    }
}

#[test]
fn undecodable_identifiers_do_not_collide() {
    assert_eq!(
        parse("phasset://?localIdentifier=%FF"),
        Err(ParseError::InvalidParameterFormat(LOCAL_IDENTIFIER))
    );
    assert_eq!(
        parse("phasset://?localIdentifier=%FE"),
        Err(ParseError::InvalidParameterFormat(LOCAL_IDENTIFIER))
    );
    assert_eq!(
        parse("phasset://?localIdentifier=%C3%A9").unwrap().local_identifier,
        "é"
    );
}
