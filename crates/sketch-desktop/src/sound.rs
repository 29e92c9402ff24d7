//! Sound clips played through rodio.
//!
//! Clips are read once and kept in memory; each clip owns one sink, so
//! replaying a clip restarts it instead of mixing a second copy in.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use sketch_core::{CanvasError, Result, sound_file_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::state;

enum Clip {
    Ready { data: Arc<[u8]>, sink: Option<Sink> },
    /// Looked for and not found; plays nothing.
    Missing,
}

/// Loaded clips by file name.
#[derive(Default)]
pub(crate) struct SoundBank {
    clips: HashMap<String, Clip>,
}

impl SoundBank {
    pub fn is_loaded(&self, file: &str) -> bool {
        matches!(self.clips.get(file), Some(Clip::Ready { .. }))
    }

    pub fn is_missing(&self, file: &str) -> bool {
        matches!(self.clips.get(file), Some(Clip::Missing))
    }

    /// Read and check `file`. A missing file is remembered and reported
    /// again on later loads without searching again.
    pub fn load(&mut self, file: &str, dirs: &[PathBuf]) -> Result<()> {
        match self.clips.get(file) {
            Some(Clip::Ready { .. }) => return Ok(()),
            Some(Clip::Missing) => return Err(CanvasError::SoundNotFound(file.to_string())),
            None => {}
        }
        let Some(path) = find_sound(file, dirs) else {
            log::warn!("sound `{file}` not found");
            self.clips.insert(file.to_string(), Clip::Missing);
            return Err(CanvasError::SoundNotFound(file.to_string()));
        };
        let data: Arc<[u8]> = std::fs::read(&path)?.into();
        Decoder::new(Cursor::new(data.clone())).map_err(|err| CanvasError::SoundDecode {
            name: file.to_string(),
            reason: err.to_string(),
        })?;
        log::debug!("loaded sound {}", path.display());
        self.clips
            .insert(file.to_string(), Clip::Ready { data, sink: None });
        Ok(())
    }

    fn play(&mut self, file: &str, output: &OutputStreamHandle) -> Result<()> {
        let Some(Clip::Ready { data, sink }) = self.clips.get_mut(file) else {
            return Ok(());
        };
        if sink.is_none() {
            *sink = Some(Sink::try_new(output).map_err(|err| CanvasError::Audio(err.to_string()))?);
        }
        let Some(sink) = sink.as_ref() else {
            return Ok(());
        };
        let source = Decoder::new(Cursor::new(data.clone())).map_err(|err| CanvasError::SoundDecode {
            name: file.to_string(),
            reason: err.to_string(),
        })?;
        sink.clear();
        sink.append(source);
        sink.play();
        Ok(())
    }
}

/// `file` in the working directory, else in the first of `dirs` holding it.
pub fn find_sound(file: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let here = Path::new(file);
    if here.is_file() {
        return Some(here.to_path_buf());
    }
    dirs.iter().map(|dir| dir.join(file)).find(|p| p.is_file())
}

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

#[derive(Default)]
struct Audio {
    output: Option<Output>,
    bank: SoundBank,
}

impl Audio {
    fn handle(&mut self) -> Result<&OutputStreamHandle> {
        if self.output.is_none() {
            let (stream, handle) =
                OutputStream::try_default().map_err(|err| CanvasError::Audio(err.to_string()))?;
            self.output = Some(Output {
                _stream: stream,
                handle,
            });
        }
        match &self.output {
            Some(output) => Ok(&output.handle),
            None => Err(CanvasError::Audio("no output stream".into())),
        }
    }
}

thread_local! {
    static AUDIO: RefCell<Audio> = RefCell::new(Audio::default());
}

fn sound_dirs() -> Vec<PathBuf> {
    state::with(|d| d.config.sound_dirs.clone())
}

/// Preload sounds. Every name is tried; the first failure is returned.
pub fn load_sounds(names: &[&str]) -> Result<()> {
    let dirs = sound_dirs();
    AUDIO.with(|audio| {
        let mut audio = audio.borrow_mut();
        let mut first_err = None;
        for name in names {
            if let Err(err) = audio.bank.load(&sound_file_name(name), &dirs) {
                log::error!("{err}");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    })
}

/// Play a sound from its beginning, loading it on first use. A sound
/// already known to be missing plays nothing.
pub fn play_sound(name: &str) -> Result<()> {
    let file = sound_file_name(name);
    let dirs = sound_dirs();
    AUDIO.with(|audio| {
        let mut audio = audio.borrow_mut();
        if audio.bank.is_missing(&file) {
            return Ok(());
        }
        audio.bank.load(&file, &dirs)?;
        let handle = audio.handle()?.clone();
        audio.bank.play(&file, &handle)
    })
}
