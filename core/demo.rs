//! `--demo` support: writes a small tree of sample files, one per grammar
//! family plus a few extra languages, so the tool can be tried without
//! pointing it at real code. Each sample mixes comments, code and the
//! decoys the stripper must leave alone.

use crate::CoreError;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEMO_DIR: &str = "demo_files";

const DEMO_FILES: &[(&str, &str)] = &[
    (
        "sample.c",
        "/* Allocation helpers. */\n#include <stdlib.h>\n\nint main(void) {\n    // not ready yet\n    char *msg = \"// this stays\";\n    return 0; /* always */\n}\n",
    ),
    (
        "sample.py",
        "#!/usr/bin/env python3\n# Entry point\nimport sys\n\nGREETING = \"hello # world\"\n\ndef main():\n    \"\"\"Docstrings are strings, not comments.\"\"\"\n    print(GREETING)  # say it\n\nif __name__ == \"__main__\":\n    main()\n",
    ),
    (
        "sample.sh",
        "#!/bin/sh\n# Deployment helper\nset -e\n\nURL=\"https://example.com/releases\"\necho \"fetching $URL\"  # verbose\n",
    ),
    (
        "sample.rb",
        "# frozen helper\n=begin\nLong form documentation block.\n=end\nputs \"tag #main\"  # prints\n",
    ),
    (
        "sample.js",
        "// bootstrap\nconst endpoint = `https://api.example.com`; // template literal\n/* banner:\n   multi line */\nconsole.log(\"/* untouched */\");\n",
    ),
    (
        "sample.go",
        "package main\n\nimport \"fmt\"\n\n// main prints a raw string.\nfunc main() {\n\tfmt.Println(`raw // not a comment`) /* inline */\n}\n",
    ),
    (
        "sample.rs",
        "//! Crate docs go away too.\n\n/// Greets.\nfn greet() -> String {\n    String::from(\"// inside a string\") // trailing\n}\n",
    ),
    (
        "sample.css",
        "/* layout */\n.grid {\n    color: #FF00FF; /* brand color: #FF00FF */\n}\n",
    ),
    (
        "sample.html",
        "<!DOCTYPE html>\n<!-- page shell -->\n<html>\n  <head>\n    <style>\n      /* embedded css */\n      body { margin: 0; }\n    </style>\n    <script>\n      // embedded js\n      console.log(\"<!-- not a comment -->\");\n    </script>\n  </head>\n  <body><p>content</p></body>\n</html>\n",
    ),
    (
        "sample.xml",
        "<?xml version=\"1.0\"?>\n<!-- build manifest -->\n<project name=\"demo\"/>\n",
    ),
    (
        "sample.yaml",
        "# service settings\nname: demo\nurl: https://example.com/path#anchor\nreplicas: 2  # keep small\n",
    ),
    (
        "sample.toml",
        "# package metadata\n[package]\nname = \"demo\"  # crate name\nhomepage = \"https://example.com\"\n",
    ),
    (
        "Dockerfile",
        "# build stage\nFROM alpine:3.20\nRUN echo \"#not-a-comment\" > /tag  # writes a literal hash\n",
    ),
];

/// Writes the sample set into `<target>/demo_files` and returns that
/// directory. Existing samples are overwritten so repeated demos start
/// from the same state.
pub fn create_demo_files(target: &Path) -> Result<PathBuf, CoreError> {
    let demo_dir = target.join(DEMO_DIR);
    fs::create_dir_all(&demo_dir)?;
    for (name, content) in DEMO_FILES {
        fs::write(demo_dir.join(name), content)?;
    }
    Ok(demo_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;

    #[test]
    fn creates_one_file_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let demo_dir = create_demo_files(dir.path()).unwrap();
        assert_eq!(demo_dir, dir.path().join(DEMO_DIR));
        for (name, _) in DEMO_FILES {
            assert!(demo_dir.join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn every_sample_is_a_supported_language() {
        for (name, _) in DEMO_FILES {
            assert!(
                language::profile_for_path(Path::new(name)).is_some(),
                "{name} is not in the catalog"
            );
        }
    }

    #[test]
    fn samples_actually_contain_strippable_comments() {
        use crate::preserve::PreserveSet;
        let preserve = PreserveSet::default();
        for (name, content) in DEMO_FILES {
            let profile = language::profile_for_path(Path::new(name)).unwrap();
            let outcome = crate::stripper::strip(content, profile.grammar, &preserve).unwrap();
            assert!(
                outcome.comments_removed > 0,
                "{name} should lose at least one comment"
            );
        }
    }
}
