//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pipeline::PipelineDefinition;

/// Renders a pipeline as pretty-printed JSON.
pub fn to_json(def: &PipelineDefinition) -> serde_json::Result<String> {
    serde_json::to_string_pretty(def)
}

/// Reads a pipeline back from the JSON produced by [`to_json`].
pub fn from_json(json: &str) -> serde_json::Result<PipelineDefinition> {
    serde_json::from_str(json)
}
