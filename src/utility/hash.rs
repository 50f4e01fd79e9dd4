//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::collections::{HashMap, HashSet};

/// A `HashMap` keyed with `ahash`. Every map in the crate is keyed by
/// short pass or pipeline names, where `ahash` is much faster than SipHash.
pub type SaHashMap<K, V> = HashMap<K, V, ahash::RandomState>;

/// A `HashSet` hashed with `ahash`, see [`SaHashMap`].
pub type SaHashSet<V> = HashSet<V, ahash::RandomState>;
