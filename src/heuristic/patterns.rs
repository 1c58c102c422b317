//! Lexical pattern table for feature extraction.
//!
//! Each rule names the signal it raises, the part of the diff it is
//! matched against, and an optional file path filter for line rules.
//! The extractor only walks this table; it holds no patterns of its own.

use regex::Regex;
use std::sync::OnceLock;

/// A boolean predicate raised by a pattern match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    BugVocabulary,
    DocsFile,
    TestFile,
    ConfigFile,
    DependencyManifest,
    NewFunction,
    NewClass,
    NewComponent,
    NewEndpoint,
    RefactorVocabulary,
    StyleVocabulary,
}

/// Which part of the diff a rule is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// File paths taken from per-file headers
    Path,
    /// Content of added lines only
    AddedLine,
    /// Content of added and removed lines
    ChangedLine,
}

#[derive(Debug)]
pub struct PatternRule {
    pub name: &'static str,
    pub signal: Signal,
    pub scope: Scope,
    pub pattern: &'static str,
    /// Line rules with a filter only match inside files whose path matches it
    pub path_filter: Option<&'static str>,
}

pub const PATTERN_TABLE: &[PatternRule] = &[
    PatternRule {
        name: "bug-vocabulary",
        signal: Signal::BugVocabulary,
        scope: Scope::ChangedLine,
        pattern: r"(?i)\b(fix(e[sd])?|bug(s|fix)?|hotfix|errors?|crash(es|ed)?|exceptions?|fault|broken|regression|patch(ed)?|resolves?)\b",
        path_filter: None,
    },
    PatternRule {
        name: "docs-file",
        signal: Signal::DocsFile,
        scope: Scope::Path,
        pattern: r"(?i)(\.(md|mdx|markdown|rst|adoc)$|(^|/)(readme|changelog|contributing)[^/]*$)",
        path_filter: None,
    },
    PatternRule {
        name: "test-file",
        signal: Signal::TestFile,
        scope: Scope::Path,
        pattern: r"(?i)((^|/)(tests?|__tests__|specs?)/|[._-](test|spec)s?\.[a-z0-9]+$|(^|/)test_[^/]+\.py$)",
        path_filter: None,
    },
    PatternRule {
        name: "config-file",
        signal: Signal::ConfigFile,
        scope: Scope::Path,
        pattern: r"(?i)(\.(json|ya?ml|toml|ini|cfg|conf|properties)$|(^|/)\.[\w.-]*rc$|(^|/)\.env(\.[\w-]+)?$)",
        path_filter: None,
    },
    PatternRule {
        name: "dependency-manifest",
        signal: Signal::DependencyManifest,
        scope: Scope::Path,
        pattern: r"(?i)(^|/)(package(-lock)?\.json|yarn\.lock|pnpm-lock\.yaml|cargo\.(toml|lock)|go\.(mod|sum)|requirements[\w.-]*\.txt|pipfile(\.lock)?|pyproject\.toml|poetry\.lock|gemfile(\.lock)?|composer\.(json|lock)|pom\.xml|build\.gradle(\.kts)?)$",
        path_filter: None,
    },
    PatternRule {
        name: "function-declaration",
        signal: Signal::NewFunction,
        scope: Scope::AddedLine,
        pattern: r"^\s*((pub(\([\w:]+\))?\s+)?(async\s+)?fn\s+\w+|(export\s+)?(default\s+)?(async\s+)?function\s*\*?\s*\w+|(async\s+)?def\s+\w+|func\s+(\([^)]*\)\s*)?\w+|export\s+(const|let)\s+\w+\s*=\s*(async\s*)?(\([^)]*\)|\w+)\s*=>)",
        path_filter: None,
    },
    PatternRule {
        name: "class-declaration",
        signal: Signal::NewClass,
        scope: Scope::AddedLine,
        pattern: r"^\s*((export\s+)?(default\s+)?(abstract\s+)?class\s+\w+|(pub(\([\w:]+\))?\s+)?(struct|enum|trait)\s+\w+|(export\s+)?interface\s+\w+|type\s+\w+\s+struct\b)",
        path_filter: None,
    },
    PatternRule {
        name: "component-export",
        signal: Signal::NewComponent,
        scope: Scope::AddedLine,
        pattern: r"^\s*export\s+(default\s+)?(function|const|class)\s+[A-Z]\w*",
        path_filter: Some(r"(?i)\.(jsx|tsx|vue|svelte)$"),
    },
    PatternRule {
        name: "route-registration",
        signal: Signal::NewEndpoint,
        scope: Scope::AddedLine,
        pattern: r#"(\b(app|router|server|api|routes)\.(get|post|put|patch|delete|route)\s*\(\s*["'`/]|\.route\(\s*["']/)"#,
        path_filter: None,
    },
    PatternRule {
        name: "route-annotation",
        signal: Signal::NewEndpoint,
        scope: Scope::AddedLine,
        pattern: r"(@(Get|Post|Put|Patch|Delete|Request)Mapping\b|@(app|router|bp|blueprint)\.(route|get|post|put|patch|delete)\b|#\[(get|post|put|patch|delete|route)\()",
        path_filter: None,
    },
    PatternRule {
        name: "refactor-vocabulary",
        signal: Signal::RefactorVocabulary,
        scope: Scope::ChangedLine,
        pattern: r"(?i)\b(refactor(s|ed|ing)?|clean[\s-]?up|restructur(e|ed|es|ing)|reorganiz(e|ed|es|ing)|simplif(y|ied|ies))\b",
        path_filter: None,
    },
    PatternRule {
        name: "style-vocabulary",
        signal: Signal::StyleVocabulary,
        scope: Scope::ChangedLine,
        pattern: r"(?i)\b(formatt(ed|ing)|reformat(ted)?|lint(s|ing|er)?|prettier|eslint|rustfmt|clippy|code[\s-]?style)\b",
        path_filter: None,
    },
];

/// A changed line made only of whitespace, brackets and punctuation
const TRIVIAL_LINE_PATTERN: &str = r"^[\s{}()\[\]<>;:,.]*$";

#[derive(Debug)]
pub struct CompiledRule {
    pub rule: &'static PatternRule,
    regex: Regex,
    path_filter: Option<Regex>,
}

impl CompiledRule {
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Whether a line rule applies inside the file at `path`
    pub fn applies_to(&self, path: Option<&str>) -> bool {
        match &self.path_filter {
            None => true,
            Some(filter) => path.is_some_and(|p| filter.is_match(p)),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// The pattern table, compiled once per process
pub fn compiled_rules() -> &'static [CompiledRule] {
    static RULES: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        PATTERN_TABLE
            .iter()
            .map(|rule| CompiledRule {
                rule,
                regex: compile(rule.pattern),
                path_filter: rule.path_filter.map(compile),
            })
            .collect()
    })
}

pub fn is_trivial_line(line: &str) -> bool {
    static TRIVIAL: OnceLock<Regex> = OnceLock::new();
    TRIVIAL
        .get_or_init(|| compile(TRIVIAL_LINE_PATTERN))
        .is_match(line)
}
