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

//! Query parameter names understood by the loader. Names are case-sensitive.

/// Opaque key of the asset in the store. Required.
pub const LOCAL_IDENTIFIER: &str = "localIdentifier";
/// `WIDTHxHEIGHT` or the maximum-size sentinel.
pub const TARGET_SIZE: &str = "targetSize";
/// Integer raw value of [`ResizeMode`](super::ResizeMode).
pub const RESIZE_MODE: &str = "resizeMode";
/// Integer raw value of [`DeliveryMode`](super::DeliveryMode).
pub const DELIVERY_MODE: &str = "deliveryMode";
/// Integer raw value of [`ContentMode`](super::ContentMode).
pub const CONTENT_MODE: &str = "contentMode";
/// Boolean literal, parsed leniently.
pub const NETWORK_ACCESS_ALLOWED: &str = "isNetworkAccessAllowed";
