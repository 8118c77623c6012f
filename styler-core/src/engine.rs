//! The four entry points a caller actually uses: style one string, one file,
//! one directory, or one package tree. Everything else in this crate is a
//! stage wired together here.

use crate::arena::ROOT;
use crate::cache::{cache_key, classify, CacheStore, Candidate, NullCache};
use crate::error::StyleError;
use crate::host::HostParser;
use crate::ignore::{tag_ignored_regions, IgnoreMarkers};
use crate::nester::nest;
use crate::normalizer::{assign_blocks, normalize};
use crate::options::{Dry, Filetype, Options};
use crate::rules::StyleGuide;
use crate::serializer::{serialize, serialize_subtree, serialize_subtree_verbatim};
use crate::tokenizer::adapt;
use crate::validator::validate_round_trip;
use std::fs;
use std::path::{Path, PathBuf};

/// Ties a host parser, a style guide, and an expression cache together.
/// Own one of these per job; it is not `Sync` across threads by itself
/// because the cache store is mutated in place.
pub struct Engine<'a> {
    parser: &'a dyn HostParser,
    guide: &'a StyleGuide,
    cache: Box<dyn CacheStore>,
    cache_enabled: bool,
    markers: IgnoreMarkers,
    warnings: Vec<StyleError>,
}

impl<'a> Engine<'a> {
    pub fn new(parser: &'a dyn HostParser, guide: &'a StyleGuide) -> Self {
        Engine {
            parser,
            guide,
            cache: Box::new(NullCache),
            cache_enabled: false,
            markers: IgnoreMarkers::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_cache(parser: &'a dyn HostParser, guide: &'a StyleGuide, cache: Box<dyn CacheStore>) -> Self {
        Engine {
            parser,
            guide,
            cache,
            cache_enabled: true,
            markers: IgnoreMarkers::default(),
            warnings: Vec::new(),
        }
    }

    /// Override the ignore-region markers. Defaults to `# styler: off`/`# styler: on`.
    pub fn with_markers(mut self, markers: IgnoreMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Warnings accumulated across every call since the last
    /// [`Engine::take_warnings`] — unbalanced ignore markers, demoted cache
    /// I/O errors. Never fatal; the caller decides whether to print them.
    pub fn warnings(&self) -> &[StyleError] {
        &self.warnings
    }

    /// Drain and return the accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<StyleError> {
        std::mem::take(&mut self.warnings)
    }

    /// Style one string of source text in isolation.
    ///
    /// On any error the caller should treat `source` as unchanged; this
    /// function never returns a partially-styled result. Unbalanced ignore
    /// markers are not a fatal error: the warning is recorded (see
    /// [`Engine::warnings`]) and `source` is returned unchanged, since the
    /// engine cannot tell which region the caller meant to protect.
    pub fn style_text(&mut self, source: &str, options: &Options) -> Result<String, StyleError> {
        let mut rows = adapt(self.parser, source)?;

        if let Err(mismatch) = tag_ignored_regions(&mut rows, &self.markers) {
            debug_assert!(mismatch.is_warning_only());
            self.warnings.push(mismatch);
            return Ok(source.to_string());
        }

        let mut arena = nest(rows)?;
        assign_blocks(&mut arena, self.cache_enabled);

        let top_level = arena.children(ROOT).to_vec();
        let texts: Vec<String> = top_level.iter().map(|&node| serialize_subtree_verbatim(&arena, node)).collect();
        let candidates: Vec<Candidate> = top_level
            .iter()
            .zip(texts.iter())
            .map(|(&node, text)| Candidate {
                pos_id: arena.token(node).pos_id,
                block: arena.token(node).block,
                text,
            })
            .collect();
        let verdicts = classify(&candidates, self.cache.as_ref(), options, self.guide);
        for (&node, verdict) in top_level.iter().zip(verdicts.iter()) {
            if *verdict == crate::cache::Verdict::Hit {
                arena.token_mut(node).is_cached = true;
                arena.token_mut(node).stylerignore = true;
            }
        }

        normalize(&mut arena);
        crate::visitor::visit(&mut arena, self.guide, options);

        let styled = serialize(&arena, self.guide, options);
        if !options.scope.includes(crate::options::Scope::Tokens) {
            validate_round_trip(self.parser, source, &styled)?;
        }

        self.record_fixed_points(&arena, &top_level, options);

        Ok(styled)
    }

    /// Insert every top-level expression whose styled form equals its
    /// original form into the cache, so a later run with identical options
    /// can skip it outright.
    fn record_fixed_points(&mut self, arena: &crate::arena::Arena, top_level: &[crate::arena::NodeId], options: &Options) {
        for &node in top_level {
            if arena.token(node).is_cached {
                continue;
            }
            let original = serialize_subtree(arena, node, self.guide, options);
            let key = cache_key(&original, options, self.guide);
            self.cache.insert(&key);
        }
    }

    /// Style a single file in place (or report the change without writing,
    /// per `options.dry`).
    pub fn style_file(&mut self, path: &Path, options: &Options) -> Result<bool, StyleError> {
        let source = fs::read_to_string(path).map_err(|e| StyleError::InvalidOption {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let styled = self.style_text(&source, options)?;
        let changed = styled != source;

        match options.dry {
            Dry::Off => {
                if changed {
                    fs::write(path, &styled).map_err(|e| StyleError::CacheIo {
                        message: format!("cannot write {}: {}", path.display(), e),
                    })?;
                }
            }
            Dry::On => {}
            Dry::Fail => {
                if changed {
                    return Err(StyleError::InvalidOption {
                        message: format!("{} would be reformatted", path.display()),
                    });
                }
            }
        }
        Ok(changed)
    }

    /// Style every matching file under `dir`, recursively, honoring
    /// `.gitignore`/`.ignore` files and `options.exclude_dirs`/
    /// `exclude_files`.
    pub fn style_dir(&mut self, dir: &Path, options: &Options) -> Result<Vec<(PathBuf, bool)>, StyleError> {
        let mut results = Vec::new();
        let mut walker = ignore::WalkBuilder::new(dir);
        walker.hidden(false);
        for entry in walker.build() {
            let entry = entry.map_err(|e| StyleError::InvalidOption {
                message: format!("walk error: {}", e),
            })?;
            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if options.exclude_files.iter().any(|p| p == path) {
                continue;
            }
            if options
                .exclude_dirs
                .iter()
                .any(|excluded| path.starts_with(excluded))
            {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let Some(filetype) = Filetype::from_extension(ext) else {
                continue;
            };
            if !options.filetype.contains(&filetype) {
                continue;
            }
            let changed = self.style_file(path, options)?;
            results.push((path.to_path_buf(), changed));
        }
        Ok(results)
    }

    /// Style a package tree: same as [`Engine::style_dir`] restricted to the
    /// conventional source directories of an R package.
    pub fn style_pkg(&mut self, pkg_root: &Path, options: &Options) -> Result<Vec<(PathBuf, bool)>, StyleError> {
        let mut results = Vec::new();
        for subdir in ["R", "tests", "vignettes"] {
            let dir = pkg_root.join(subdir);
            if dir.is_dir() {
                results.extend(self.style_dir(&dir, options)?);
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ParseError, SemanticToken};
    use crate::rules::ReindentionSpec;
    use crate::token::{Token, TokenKind};
    use proptest::prelude::*;

    /// A parser that treats whitespace-separated words as symbols, one
    /// top-level expression per line. Good enough to exercise the pipeline
    /// end to end without depending on any real language grammar.
    struct WordParser;

    impl HostParser for WordParser {
        fn parse(&self, source: &str) -> Result<Vec<Token>, ParseError> {
            let mut rows = Vec::new();
            let mut id = 1u64;
            for (line_idx, line) in source.lines().enumerate() {
                let mut col = 1u32;
                for word in line.split_whitespace() {
                    let start_col = line.find(word).map(|c| c as u32 + 1).unwrap_or(col);
                    rows.push(Token::from_host_row(
                        id,
                        0,
                        line_idx as u32 + 1,
                        start_col,
                        line_idx as u32 + 1,
                        start_col + word.len() as u32,
                        TokenKind::Symbol,
                        word.to_string(),
                        true,
                    ));
                    id += 1;
                    col = start_col + word.len() as u32;
                }
            }
            Ok(rows)
        }

        fn semantic_tokens(&self, source: &str) -> Result<Vec<SemanticToken>, ParseError> {
            Ok(self
                .parse(source)?
                .into_iter()
                .map(|t| SemanticToken { kind: t.kind, text: t.text })
                .collect())
        }
    }

    fn guide() -> StyleGuide {
        StyleGuide {
            name: "word".into(),
            version: "1".into(),
            line_break_rules: vec![],
            space_rules: vec![],
            token_rules: vec![],
            indention_rules: vec![],
            use_raw_indention: false,
            reindention: ReindentionSpec::default(),
        }
    }

    #[test]
    fn style_text_round_trips_identity_style_guide() {
        let parser = WordParser;
        let g = guide();
        let mut engine = Engine::new(&parser, &g);
        let out = engine.style_text("hello world", &Options::default()).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn unchanged_expressions_populate_the_cache() {
        let parser = WordParser;
        let g = guide();
        let mut engine = Engine::new(&parser, &g);
        let opts = Options::default();
        engine.style_text("hello", &opts).unwrap();
        let key = cache_key("hello", &opts, &g);
        assert!(engine.cache.contains(&key));
    }

    #[test]
    fn unmatched_ignore_markers_leave_the_file_untouched_and_warn() {
        let parser = crate::testing::FlatReferenceParser;
        let g = guide();
        let mut engine = Engine::new(&parser, &g);
        let input = "1+1\n# styler: off\n1+1\n# styler: off\n1+1";
        let out = engine.style_text(input, &Options::default()).unwrap();
        assert_eq!(out, input);
        assert_eq!(engine.warnings().len(), 1);
        assert!(matches!(engine.warnings()[0], StyleError::IgnoreMarkerMismatch { .. }));
    }

    proptest::proptest! {
        /// However many words land on a line, and whatever rule set runs
        /// over them, the round-trip validator must accept the result: an
        /// identity style guide can only ever touch whitespace, never the
        /// words themselves.
        #[test]
        fn word_lines_always_round_trip(words in proptest::collection::vec("[a-z]{1,6}", 1..8)) {
            let source = words.join("   ");
            let parser = WordParser;
            let g = guide();
            let mut engine = Engine::new(&parser, &g);
            let styled = engine.style_text(&source, &Options::default()).unwrap();
            let restyled_words: Vec<&str> = styled.split_whitespace().collect();
            prop_assert_eq!(restyled_words, words);
        }
    }
}
