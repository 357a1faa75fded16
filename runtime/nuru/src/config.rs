//! `IConfiguration`-equivalent binding (§4.7.2, §4.7.6).
//!
//! [`Config::load`] implements the layering order the emitted dispatcher's
//! `.add_configuration()` branch is specified to build: base appsettings, an
//! environment-specific overlay, an optional app-named overlay, environment
//! variables, then the original (unstripped) command-line arguments. The emitted code
//! calls this once per process and hands the result to any handler parameter bound
//! via [`nuru_ir::BindingSource::Configuration`].

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

#[cfg(feature = "config")]
use figment::Figment;
#[cfg(feature = "config")]
use figment::providers::{Env, Format, Json, Serialized};

/// A typed, bound slice of configuration, keyed by an `#[configuration_key("Section")]`
/// annotation on the handler parameter it's injected into.
pub struct Config<T> {
    value: T,
}

impl<T> Config<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> std::ops::Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Where `Config::load` looks for the base/overlay settings files, per §4.7.2:
/// `{base_path}/appsettings.json`, `{base_path}/appsettings.{env}.json`, and — if
/// `app_name` is known — `{base_path}/{app_name}.settings.json` /
/// `{base_path}/{app_name}.settings.{env}.json`.
pub struct ConfigSources {
    pub base_path: PathBuf,
    pub app_name: Option<String>,
}

impl ConfigSources {
    /// `DOTNET_ENVIRONMENT` then `ASPNETCORE_ENVIRONMENT` then `"Production"`, exactly
    /// the fallback chain named in §4.7.2.
    pub fn environment_name() -> String {
        std::env::var("DOTNET_ENVIRONMENT")
            .or_else(|_| std::env::var("ASPNETCORE_ENVIRONMENT"))
            .unwrap_or_else(|_| "Production".to_string())
    }
}

#[cfg(feature = "config")]
/// Build a [`Figment`] layering every source named in §4.7.2, in order, over the given
/// (already configuration-override-stripped or original, per caller) command-line args.
pub fn build_figment(sources: &ConfigSources, original_args: &[String]) -> Figment {
    let env = ConfigSources::environment_name();
    let mut figment = Figment::new();

    figment = merge_json_if_present(figment, &sources.base_path.join("appsettings.json"));
    figment = merge_json_if_present(
        figment,
        &sources.base_path.join(format!("appsettings.{env}.json")),
    );
    if let Some(app_name) = &sources.app_name {
        figment = merge_json_if_present(
            figment,
            &sources.base_path.join(format!("{app_name}.settings.json")),
        );
        figment = merge_json_if_present(
            figment,
            &sources
                .base_path
                .join(format!("{app_name}.settings.{env}.json")),
        );
    }
    figment = figment.merge(Env::raw().split("__"));
    figment = figment.merge(Serialized::defaults(command_line_overrides(original_args)));
    figment
}

#[cfg(feature = "config")]
fn merge_json_if_present(figment: Figment, path: &Path) -> Figment {
    if path.exists() {
        figment.merge(Json::file(path))
    } else {
        figment
    }
}

/// Parse the `--key=value` / `--section:key=value` / `/key=value` / `/section:key=value`
/// tokens out of the *original, unstripped* argv (§4.7.2) into a flat key/value map.
#[cfg(feature = "config")]
fn command_line_overrides(args: &[String]) -> std::collections::BTreeMap<String, String> {
    args.iter()
        .filter_map(|a| is_configuration_override(a))
        .collect()
}

/// `true` (with the parsed key/value) iff `token` matches one of the four forms named
/// in §4.7.2. Shared with the emitted dispatcher's argument-normalization pass, which
/// uses the boolean half of this to decide whether to strip a token from `routeArgs`.
pub fn is_configuration_override(token: &str) -> Option<(String, String)> {
    let body = token.strip_prefix("--").or_else(|| {
        let rest = token.strip_prefix('/')?;
        rest.chars().next()?.is_alphabetic().then_some(rest)
    })?;
    let (key, value) = body.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key.replace(':', "."), value.to_string()))
}

impl<T> std::fmt::Debug for Config<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config").field("value", &self.value).finish()
    }
}

/// A section key marker, so the emitter can generate `Config::<Section>::section_name()`
/// without hand-writing the string twice. Implemented by a `#[derive]`-free, hand
/// rolled `impl` the emitter writes alongside the binding (kept here only as the trait
/// the generated `impl` targets).
pub trait ConfigurationSection {
    const SECTION: &'static str;
}

pub struct SectionMarker<T>(PhantomData<T>);
