//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::testcase::FileTestCase;
use passpipe::utility::SaHashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

type DirectoryContents = SaHashMap<String, Vec<(String, &'static str, FileTestCase<'static>)>>;

static ALL_TEST_CASES: OnceLock<DirectoryContents> = OnceLock::new();

fn recursive_build(out: &mut DirectoryContents, curr_key: String, current_dir: PathBuf) {
    let mut subdirs = Vec::default();

    {
        let files = match out.entry(curr_key.clone()) {
            Entry::Vacant(vac) => vac.insert(Vec::default()),
            Entry::Occupied(_) => unreachable!(),
        };

        for entry in fs::read_dir(current_dir).expect("invalid directory") {
            let entry = entry.expect("i/o error");
            let metadata = entry.metadata().expect("unable to read metadata");
            let name = entry.file_name().into_string().expect("invalid UTF-8 path");
            let path = entry.path();

            if metadata.is_dir() {
                let inner = if curr_key.is_empty() {
                    name
                } else {
                    format!("{curr_key}/{name}")
                };

                subdirs.push((inner, path.clone()));
            } else if name.ends_with(".pipeline") {
                // test cases live for the rest of the process once discovered
                let content: &'static str = Box::leak(
                    fs::read_to_string(&path)
                        .expect("unable to read file")
                        .into_boxed_str(),
                );
                let check = FileTestCase::from_raw(&name, content);

                files.push((name, content, check))
            }
        }

        files.sort_by(|(n1, _, _), (n2, _, _)| n1.cmp(n2));
    }

    for (inner, path) in subdirs {
        recursive_build(out, inner, path);
    }
}

fn init_directory() -> DirectoryContents {
    let mut map = DirectoryContents::default();
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.push("tests/");

    recursive_build(&mut map, String::default(), root);

    map
}

pub fn cases_in_subdir(path: &'static str) -> &'static [(String, &'static str, FileTestCase<'static>)] {
    let all = ALL_TEST_CASES.get_or_init(init_directory);

    assert!(all.contains_key(path), "no files found for path `{path}`");

    &all[path]
}
