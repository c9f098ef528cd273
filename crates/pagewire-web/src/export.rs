//! Functions exposed on the JavaScript side

use std::cell::RefCell;

use pagewire::{AppError, ExitSignal};
use tracing::debug;

thread_local! {
    static EXIT: RefCell<Option<ExitSignal>> = const { RefCell::new(None) };
}

/// Makes `signal` the one fired by the exported `exit`
///
/// ```ignore
/// let app = Application::new(platform, "#app")?;
/// pagewire_web::export_exit(app.exit_signal());
/// ```
pub fn export_exit(signal: ExitSignal) {
    EXIT.with(|exit| *exit.borrow_mut() = Some(signal));
    debug!("exit signal exported");
}

/// Fires the exported exit signal; `Ok(false)` when none was exported
pub fn fire_exit() -> Result<bool, AppError> {
    let signal = EXIT.with(|exit| exit.borrow().clone());
    match signal {
        Some(signal) => signal.fire().map(|()| true),
        None => Ok(false),
    }
}

/// `exit()` in the browser console stops the exported application
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = exit)]
pub fn exit_js() -> Result<(), wasm_bindgen::JsValue> {
    fire_exit()
        .map(|_| ())
        .map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_without_export_is_a_no_op() {
        assert!(!fire_exit().unwrap());
    }

    #[test]
    fn test_exported_signal_fires_once() {
        let signal = ExitSignal::new();
        export_exit(signal.clone());

        assert!(fire_exit().unwrap());
        assert!(signal.is_fired());
        assert!(matches!(fire_exit(), Err(AppError::AlreadySignalled)));
    }
}
