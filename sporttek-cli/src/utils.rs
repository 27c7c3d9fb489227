use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Error;

pub fn read_json<T, P>(path: P) -> Result<T, Error>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let buf = fs::read(path.as_ref())?;
    log::debug!("Read {} bytes from {}", buf.len(), path.as_ref().display());

    Ok(serde_json::from_slice(&buf)?)
}

pub fn print_json<T>(value: &T) -> Result<(), Error>
where
    T: Serialize,
{
    let mut writer = io::stdout().lock();
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;

    Ok(())
}
