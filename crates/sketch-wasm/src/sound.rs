//! Sound playback through cached `<audio>` elements.

use crate::page::dom_error;
use sketch_core::{Result, sound_file_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

/// An audio element and the handler for its rejected `play()` promises.
#[derive(Clone)]
struct Clip {
    audio: HtmlAudioElement,
    on_reject: Rc<Closure<dyn FnMut(JsValue)>>,
}

thread_local! {
    static CLIPS: RefCell<HashMap<String, Clip>> = RefCell::new(HashMap::new());
}

fn clip(file: &str) -> Result<Clip> {
    CLIPS.with(|clips| {
        if let Some(clip) = clips.borrow().get(file) {
            return Ok(clip.clone());
        }
        let audio = HtmlAudioElement::new_with_src(file).map_err(dom_error)?;
        audio.set_preload("auto");
        let name = file.to_string();
        let on_reject = Rc::new(Closure::<dyn FnMut(JsValue)>::new(move |reason: JsValue| {
            log::warn!("{}", play_failed(&name, &reason_text(&reason)));
        }));
        let clip = Clip { audio, on_reject };
        clips.borrow_mut().insert(file.to_string(), clip.clone());
        log::debug!("loaded sound {file}");
        Ok(clip)
    })
}

fn reason_text(reason: &JsValue) -> String {
    if let Some(err) = reason.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    reason.as_string().unwrap_or_else(|| format!("{reason:?}"))
}

fn play_failed(file: &str, reason: &str) -> String {
    format!("sound `{file}` did not play: {reason}")
}

/// Start fetching sounds so the first play is not delayed.
pub fn load_sounds(names: &[&str]) -> Result<()> {
    for name in names {
        clip(&sound_file_name(name))?;
    }
    Ok(())
}

/// Play a sound from its beginning. A missing or blocked file fails
/// inside the browser; that is logged as a warning and plays nothing.
pub fn play_sound(name: &str) -> Result<()> {
    let Clip { audio, on_reject } = clip(&sound_file_name(name))?;
    audio.set_current_time(0.0);
    let promise = audio.play().map_err(dom_error)?;
    let _ = promise.catch(&on_reject);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_play_names_the_file() {
        assert_eq!(
            play_failed("click.wav", "NotAllowedError: play() failed"),
            "sound `click.wav` did not play: NotAllowedError: play() failed"
        );
    }
}
