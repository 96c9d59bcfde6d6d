//! Connect IQ `manifest.xml` reading.
//!
//! Only the barrel dependencies are read: every `<iq:depends name=".." version="..">`
//! whose parent is an `<iq:barrels>` element.

use crate::error::{MbgetError, MbgetResult};
use anyhow::Context;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::fs;
use std::path::Path;

pub const CONNECTIQ_NS: &str = "http://www.garmin.com/xml/connectiq";

#[derive(Debug, Default)]
pub struct Manifest {
    depends: Vec<(String, String)>,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load manifest {}", path.display()))
    }

    pub fn parse(xml: &str) -> MbgetResult<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut manifest = Self::default();
        let mut seen_root = false;
        // One flag per open element: is it an <iq:barrels>?
        let mut open: Vec<bool> = Vec::new();

        loop {
            let (ns, event) = reader
                .read_resolved_event()
                .map_err(|e| MbgetError::ManifestParse(e.to_string()))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_iq = is_connectiq(&ns);
                    let local = e.local_name();
                    let local = local.as_ref();

                    if !seen_root {
                        if !(is_iq && local == b"manifest") {
                            return Err(MbgetError::ManifestRoot);
                        }
                        seen_root = true;
                    } else if is_iq && local == b"depends" && open.last() == Some(&true) {
                        let name = required_attribute(e, "name")?;
                        let version = required_attribute(e, "version")?;
                        manifest.declare(name, version);
                    }

                    if matches!(event, Event::Start(_)) {
                        open.push(is_iq && local == b"barrels");
                    }
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(MbgetError::ManifestRoot);
        }
        Ok(manifest)
    }

    /// Declared package names in document order.
    pub fn get_depends(&self) -> Vec<&str> {
        self.depends.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get_required_version(&self, package_name: &str) -> Option<&str> {
        self.depends
            .iter()
            .find(|(name, _)| name == package_name)
            .map(|(_, version)| version.as_str())
    }

    fn declare(&mut self, name: String, version: String) {
        if let Some(existing) = self.depends.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = version;
        } else {
            self.depends.push((name, version));
        }
    }
}

fn is_connectiq(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == CONNECTIQ_NS.as_bytes())
}

fn required_attribute(element: &BytesStart, key: &str) -> MbgetResult<String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| MbgetError::ManifestParse(e.to_string()))?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| MbgetError::ManifestParse(e.to_string()))?;
            return Ok(value.into_owned());
        }
    }

    Err(MbgetError::ManifestAttribute {
        element: String::from_utf8_lossy(element.name().as_ref()).into_owned(),
        attribute: key.to_string(),
    })
}
