//! Partial Linker Selector
//!
//! Maps a declaration function name plus the declaration's `minVersion` to
//! the linker implementation able to consume that format.

use std::collections::HashMap;

use crate::ast::{AstHost, AstNode};
use crate::file_linker::LinkerOptions;
use crate::partial_linkers::partial_component_linker_1::PartialComponentLinkerV1;
use crate::partial_linkers::partial_linker::PartialLinker;
use crate::source_file::SourceFile;

pub const DECLARE_COMPONENT: &str = "ɵɵngDeclareComponent";

/// A linker together with the newest format major it can consume.
struct VersionedLinker<'a, TExpression: AstNode, H: AstHost<TExpression>> {
    max_major: u64,
    linker: Box<dyn PartialLinker<TExpression, H> + 'a>,
}

pub struct PartialLinkerSelector<'a, TExpression: AstNode, H: AstHost<TExpression>> {
    linkers: HashMap<&'static str, Vec<VersionedLinker<'a, TExpression, H>>>,
}

impl<'a, TExpression: AstNode + 'a, H: AstHost<TExpression> + 'a>
    PartialLinkerSelector<'a, TExpression, H>
{
    pub fn new(
        options: &'a LinkerOptions,
        source_url: &'a str,
        code: &'a str,
        source_file: Option<&'a SourceFile>,
    ) -> Self {
        let mut linkers: HashMap<&'static str, Vec<VersionedLinker<'a, TExpression, H>>> =
            HashMap::new();
        linkers.insert(
            DECLARE_COMPONENT,
            vec![VersionedLinker {
                max_major: 12,
                linker: Box::new(PartialComponentLinkerV1::new(
                    options,
                    source_url,
                    code,
                    source_file,
                )),
            }],
        );
        Self { linkers }
    }

    /// Returns true if there are linkers registered for the given declaration
    /// name.
    pub fn supports_declaration(&self, name: &str) -> bool {
        self.linkers.contains_key(name)
    }

    /// Returns the linker for the given declaration name able to consume the
    /// given `minVersion`, or an error when the name is unknown or the format
    /// is newer than anything registered here.
    pub fn get_linker(
        &self,
        name: &str,
        min_version: &str,
    ) -> Result<&dyn PartialLinker<TExpression, H>, String> {
        let versions = self
            .linkers
            .get(name)
            .ok_or_else(|| format!("Unknown partial declaration function: {name}"))?;

        let major = parse_major(min_version)?;
        versions
            .iter()
            .find(|entry| major <= entry.max_major)
            .map(|entry| entry.linker.as_ref())
            .ok_or_else(|| {
                format!(
                    "Unsupported partial declaration version {min_version} for {name}; \
                     this linker supports up to major {}",
                    versions.iter().map(|entry| entry.max_major).max().unwrap_or(0)
                )
            })
    }
}

fn parse_major(version: &str) -> Result<u64, String> {
    version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u64>().ok())
        .ok_or_else(|| format!("Expected a semantic version but got: {version}"))
}
