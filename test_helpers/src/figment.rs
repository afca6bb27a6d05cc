//! Helpers for running configuration tests inside a [`figment::Jail`].

use anyhow::{Result, anyhow};

/// Runs `f` in a fresh jail after writing `files` into its directory.
///
/// The jail's working directory is a temporary directory and environment
/// changes made through it are undone on exit. The closure works in
/// `anyhow::Result`, so CLI parse errors and `GenError`s propagate with `?`;
/// its error chain is flattened into the jail's error on the way out.
///
/// # Errors
///
/// Returns an error if a file cannot be created or the closure fails.
pub fn in_jail<F, T>(files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (name, contents) in files {
            jail.create_file(name, contents)?;
        }
        let value = f(jail).map_err(|err| figment::Error::from(format!("{err:#}")))?;
        output = Some(value);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure produced no value"))
}
