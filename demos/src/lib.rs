// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Stormscroll demos: an SVG-writing host, a rough
//! Gulf coastline and synthetic heat tables.

pub mod charts;
pub mod gulf;
pub mod svg_host;
