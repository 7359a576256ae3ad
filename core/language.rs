//! The language catalog. Language selection is a pure table lookup from a
//! file's extension (or a handful of well-known filenames) to a static
//! profile; an extension that is missing from the table means the file is
//! skipped untouched.

use std::path::Path;

/// Comment grammar family a profile is scanned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    CFamily,
    HashLine,
    Python,
    Ruby,
    Html,
    Xml,
}

/// One language the tool understands. The token fields describe the syntax
/// for demo generation and `--show-config`; recognition itself is driven by
/// the grammar family.
#[derive(Debug)]
pub struct LanguageProfile {
    pub id: &'static str,
    pub display: &'static str,
    pub grammar: Grammar,
    pub extensions: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
}

pub static LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        id: "c",
        display: "C",
        grammar: Grammar::CFamily,
        extensions: &["c", "h"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "cpp",
        display: "C++",
        grammar: Grammar::CFamily,
        extensions: &["cpp", "cxx", "cc", "hpp", "hh"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "java",
        display: "Java",
        grammar: Grammar::CFamily,
        extensions: &["java"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "javascript",
        display: "JavaScript",
        grammar: Grammar::CFamily,
        extensions: &["js", "mjs", "cjs", "jsx"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "typescript",
        display: "TypeScript",
        grammar: Grammar::CFamily,
        extensions: &["ts", "tsx"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "go",
        display: "Go",
        grammar: Grammar::CFamily,
        extensions: &["go"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "rust",
        display: "Rust",
        grammar: Grammar::CFamily,
        extensions: &["rs"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "swift",
        display: "Swift",
        grammar: Grammar::CFamily,
        extensions: &["swift"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "kotlin",
        display: "Kotlin",
        grammar: Grammar::CFamily,
        extensions: &["kt", "kts"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "css",
        display: "CSS",
        grammar: Grammar::CFamily,
        extensions: &["css"],
        line_comment: None,
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "scss",
        display: "SCSS",
        grammar: Grammar::CFamily,
        extensions: &["scss"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "less",
        display: "Less",
        grammar: Grammar::CFamily,
        extensions: &["less"],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
    },
    LanguageProfile {
        id: "shell",
        display: "Shell",
        grammar: Grammar::HashLine,
        extensions: &["sh", "bash", "zsh"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "perl",
        display: "Perl",
        grammar: Grammar::HashLine,
        extensions: &["pl", "pm"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "yaml",
        display: "YAML",
        grammar: Grammar::HashLine,
        extensions: &["yaml", "yml"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "toml",
        display: "TOML",
        grammar: Grammar::HashLine,
        extensions: &["toml"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "dockerfile",
        display: "Dockerfile",
        grammar: Grammar::HashLine,
        extensions: &[],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "conf",
        display: "Config",
        grammar: Grammar::HashLine,
        extensions: &["conf"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "makefile",
        display: "Makefile",
        grammar: Grammar::HashLine,
        extensions: &["mk"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "python",
        display: "Python",
        grammar: Grammar::Python,
        extensions: &["py", "pyw"],
        line_comment: Some("#"),
        block_comment: None,
    },
    LanguageProfile {
        id: "ruby",
        display: "Ruby",
        grammar: Grammar::Ruby,
        extensions: &["rb", "rake"],
        line_comment: Some("#"),
        block_comment: Some(("=begin", "=end")),
    },
    LanguageProfile {
        id: "html",
        display: "HTML",
        grammar: Grammar::Html,
        extensions: &["html", "htm"],
        line_comment: None,
        block_comment: Some(("<!--", "-->")),
    },
    LanguageProfile {
        id: "xml",
        display: "XML",
        grammar: Grammar::Xml,
        extensions: &["xml", "xhtml", "svg"],
        line_comment: None,
        block_comment: Some(("<!--", "-->")),
    },
];

const SPECIAL_FILENAMES: &[(&str, &str)] = &[
    ("Dockerfile", "dockerfile"),
    ("Makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("Rakefile", "ruby"),
    ("Gemfile", "ruby"),
];

pub fn profile_by_id(id: &str) -> Option<&'static LanguageProfile> {
    LANGUAGES.iter().find(|p| p.id == id)
}

pub fn profile_for_path(path: &Path) -> Option<&'static LanguageProfile> {
    if let Some(name) = path.file_name() {
        let name = name.to_string_lossy();
        if let Some((_, id)) = SPECIAL_FILENAMES.iter().find(|(f, _)| *f == name.as_ref()) {
            return profile_by_id(id);
        }
    }
    let extension = path.extension()?.to_str()?.to_lowercase();
    LANGUAGES
        .iter()
        .find(|p| p.extensions.contains(&extension.as_str()))
}
