use std::cell::RefCell;

use wasm_bindgen::prelude::*;


pub type JsResult<T> = Result<T, JsValue>;

#[wasm_bindgen(getter_with_clone)]
#[derive(Clone, Debug)]
pub struct PanicReport {
    pub message: String,
    pub backtrace: String,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

// JS `Error`, for its stack trace. Same trick as in console_error_panic_hook.
#[wasm_bindgen]
extern "C" {
    type Error;
    #[wasm_bindgen(constructor)]
    fn new() -> Error;
    #[wasm_bindgen(structural, method, getter)]
    fn stack(error: &Error) -> String;
}

// Should be called once before creating a `WebClient`. The page polls `last_panic` when a call
// throws, so that it can show the report instead of a frozen board.
#[wasm_bindgen]
pub fn set_panic_hook() {
    use std::panic;
    use std::sync::Once;
    static SET_HOOK: Once = Once::new();
    SET_HOOK.call_once(|| {
        panic::set_hook(Box::new(|panic_info| {
            console_error_panic_hook::hook(panic_info);
            let report = PanicReport {
                message: panic_info.to_string(),
                backtrace: Error::new().stack(),
            };
            LAST_PANIC.with(|cell| *cell.borrow_mut() = Some(report));
        }));
    });
}

#[wasm_bindgen]
pub fn last_panic() -> Option<PanicReport> { LAST_PANIC.with(|cell| cell.borrow().clone()) }

// Recoverable failure: bad input from the page or a malformed server message.
#[wasm_bindgen(getter_with_clone)]
pub struct RustError {
    pub message: String,
}

#[macro_export]
macro_rules! rust_error {
    ($($arg:tt)*) => {
        wasm_bindgen::JsValue::from(
            $crate::web_error_handling::RustError{ message: format!($($arg)*) }
        )
    };
}
