//! Handle-based FFI for stationline.
//!
//! Functions:
//! - `stl_scene_new` / `stl_scene_free` - create a scene from JSON content and config
//! - `stl_scene_input` - feed one input event
//! - `stl_scene_step` - advance one frame, write the moving parts
//! - `stl_scene_signs` / `stl_scene_buffer_stops` - copy static placements
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Invalid argument
//! - `-3`: Buffer overflow (resize and retry)
//! - `-5`: Invalid content or config

use crate::config::SceneConfig;
use crate::content::StationList;
use crate::motion::Phase;
use crate::scene::{InputEvent, Scene, SignButton, SignOwner};
use crate::sim::{Float3, Pose};
use crate::track::Viewport;

/// Opaque handle to a scene.
pub type StlSceneHandle = *mut std::ffi::c_void;

pub const STL_INPUT_WHEEL: u32 = 0;
pub const STL_INPUT_TOUCH_START: u32 = 1;
pub const STL_INPUT_TOUCH_MOVE: u32 = 2;
pub const STL_INPUT_TOUCH_END: u32 = 3;
pub const STL_INPUT_ENTER_BRANCH: u32 = 4;
pub const STL_INPUT_GO_TO_STATION: u32 = 5;
pub const STL_INPUT_NEXT: u32 = 6;
pub const STL_INPUT_PREV: u32 = 7;
pub const STL_INPUT_RETURN: u32 = 8;
pub const STL_INPUT_RESIZE: u32 = 9;

/// One input event. Which fields matter depends on `kind`:
/// wheel and touch use `y`, branch commands use `index`, resize uses `x` and `y`
/// as width and height.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct StlInput {
    pub kind: u32,
    pub index: u32,
    pub x: f32,
    pub y: f32,
}

/// Per-frame output.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct StlFrame {
    /// Active branch's station index, or -1 on the main line.
    pub active_branch: i32,
    /// 0 idle, 1 aligning to enter, 2 on branch, 3 aligning to return.
    pub phase: u32,
    pub sub_index: u32,
    pub main_progress: f32,
    pub branch_progress: f32,
    pub scroll_offset: f32,
    pub view_offset: f32,
    /// Front loco, wagon, rear loco.
    pub carriages: [Pose; 3],
    pub camera_position: Float3,
    pub camera_look_at: Float3,
    pub camera_up: Float3,
}

pub const STL_BUTTON_ENTER: u32 = 1 << 0;
pub const STL_BUTTON_PREVIOUS: u32 = 1 << 1;
pub const STL_BUTTON_BACK: u32 = 1 << 2;
pub const STL_BUTTON_NEXT: u32 = 1 << 3;
pub const STL_BUTTON_RETURN: u32 = 1 << 4;

/// Sign placement. Text stays on the host side, addressed by `station`/`sub_chapter`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct StlSign {
    pub station: u32,
    /// Sub-chapter index for branch signs, -1 for main-line signs.
    pub sub_chapter: i32,
    pub position: Float3,
    pub width: f32,
    pub height: f32,
    pub title_y: f32,
    pub desc_y: f32,
    pub button_y: f32,
    /// Bitmask of `STL_BUTTON_*`.
    pub buttons: u32,
}

/// Create a scene.
///
/// A null `stations_json` uses the built-in station list; a null `config_json`
/// uses default tunables.
///
/// # Returns
/// - `0` on success, with `*out_handle` set
/// - `-1` if `out_handle` is null
/// - `-2` if the viewport is not finite and positive
/// - `-5` if the content or config fails to parse or validate
///
/// # Safety
/// - `stations_json` must be null or point to `stations_len` bytes of UTF-8
/// - `config_json` must be null or point to `config_len` bytes of UTF-8
/// - `out_handle` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn stl_scene_new(
    stations_json: *const u8,
    stations_len: usize,
    config_json: *const u8,
    config_len: usize,
    width: f32,
    height: f32,
    out_handle: *mut StlSceneHandle,
) -> i32 {
    if out_handle.is_null() {
        return -1;
    }
    *out_handle = std::ptr::null_mut();

    if !valid_extent(width) || !valid_extent(height) {
        return -2;
    }

    let stations = match to_str(stations_json, stations_len) {
        Some(json) => StationList::from_json_str(json),
        None if stations_json.is_null() => StationList::embedded(),
        None => return -5,
    };
    let stations = match stations {
        Ok(s) => s,
        Err(err) => {
            log::warn!("stl_scene_new: {err}");
            return -5;
        }
    };

    let config = match to_str(config_json, config_len) {
        Some(json) => SceneConfig::from_json_str(json),
        None if config_json.is_null() => Ok(SceneConfig::default()),
        None => return -5,
    };
    let config = match config {
        Ok(c) => c,
        Err(err) => {
            log::warn!("stl_scene_new: {err}");
            return -5;
        }
    };

    let scene = Scene::new(stations, config, Viewport::new(width, height));
    *out_handle = Box::into_raw(Box::new(scene)) as StlSceneHandle;
    0
}

/// Free a scene handle.
///
/// # Safety
/// - `handle` must be a valid handle returned by `stl_scene_new`, or null
#[no_mangle]
pub unsafe extern "C" fn stl_scene_free(handle: StlSceneHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle as *mut Scene));
    }
}

/// Apply one input event.
///
/// # Returns
/// - `0` if the event had an effect, `1` if it was ignored
/// - `-1` on null pointer
/// - `-2` on unknown kind or bad resize extent
///
/// # Safety
/// - `handle` must be a valid scene handle
/// - `input` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn stl_scene_input(handle: StlSceneHandle, input: *const StlInput) -> i32 {
    if handle.is_null() || input.is_null() {
        return -1;
    }
    let scene = &mut *(handle as *mut Scene);

    let event = match to_event(&*input) {
        Some(e) => e,
        None => return -2,
    };

    if scene.handle(event) {
        0
    } else {
        1
    }
}

/// Advance one frame of `dt` seconds.
///
/// # Safety
/// - `handle` must be a valid scene handle
/// - `out` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn stl_scene_step(handle: StlSceneHandle, dt: f32, out: *mut StlFrame) -> i32 {
    if handle.is_null() || out.is_null() {
        return -1;
    }
    if !dt.is_finite() {
        return -2;
    }
    let scene = &mut *(handle as *mut Scene);
    let frame = scene.step(dt);

    *out = StlFrame {
        active_branch: frame.active.branch_index().map_or(-1, |i| i as i32),
        phase: match frame.phase {
            Phase::Idle => 0,
            Phase::AligningToEnter(_) => 1,
            Phase::OnBranch(_) => 2,
            Phase::AligningToReturn(_) => 3,
        },
        sub_index: frame.sub_index as u32,
        main_progress: frame.progress.main,
        branch_progress: frame.progress.branch,
        scroll_offset: frame.scroll_offset,
        view_offset: frame.view_offset,
        carriages: frame.train.carriages.map(|c| c.pose),
        camera_position: frame.camera.position,
        camera_look_at: frame.camera.look_at,
        camera_up: frame.camera.up,
    };
    0
}

/// Copy current sign placements.
///
/// # Returns
/// - `0` on success
/// - `-1` on null pointer
/// - `-3` if `capacity` is too small (`count` contains required size)
///
/// # Safety
/// - `handle` must be a valid scene handle
/// - `out` must point to at least `capacity` writable `StlSign`s
/// - `count` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn stl_scene_signs(
    handle: StlSceneHandle,
    out: *mut StlSign,
    capacity: usize,
    count: *mut usize,
) -> i32 {
    if handle.is_null() || out.is_null() || count.is_null() {
        return -1;
    }
    let scene = &*(handle as *const Scene);
    let signs = scene.signs();

    *count = signs.len();
    if signs.len() > capacity {
        return -3;
    }

    for (i, sign) in signs.iter().enumerate() {
        let (station, sub_chapter) = match sign.owner {
            SignOwner::Main(station) => (station as u32, -1),
            SignOwner::Branch {
                station,
                sub_chapter,
            } => (station as u32, sub_chapter as i32),
        };
        *out.add(i) = StlSign {
            station,
            sub_chapter,
            position: sign.position,
            width: sign.metrics.width,
            height: sign.metrics.height,
            title_y: sign.metrics.title_y,
            desc_y: sign.metrics.desc_y,
            button_y: sign.metrics.button_y,
            buttons: sign.buttons.iter().fold(0, |mask, &b| mask | button_bit(b)),
        };
    }
    0
}

/// Copy buffer-stop poses: main start, main end, then one per branch.
///
/// # Returns
/// - `0` on success
/// - `-1` on null pointer
/// - `-3` if `capacity` is too small (`count` contains required size)
///
/// # Safety
/// - `handle` must be a valid scene handle
/// - `out` must point to at least `capacity` writable `Pose`s
/// - `count` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn stl_scene_buffer_stops(
    handle: StlSceneHandle,
    out: *mut Pose,
    capacity: usize,
    count: *mut usize,
) -> i32 {
    if handle.is_null() || out.is_null() || count.is_null() {
        return -1;
    }
    let scene = &*(handle as *const Scene);
    let stops = scene.buffer_stops();

    *count = stops.len();
    if stops.len() > capacity {
        return -3;
    }

    for (i, stop) in stops.iter().enumerate() {
        *out.add(i) = stop.pose;
    }
    0
}

fn valid_extent(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

unsafe fn to_str<'a>(ptr: *const u8, len: usize) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    std::str::from_utf8(std::slice::from_raw_parts(ptr, len)).ok()
}

fn to_event(input: &StlInput) -> Option<InputEvent> {
    let index = input.index as usize;
    let event = match input.kind {
        STL_INPUT_WHEEL => InputEvent::Wheel { delta_y: input.y },
        STL_INPUT_TOUCH_START => InputEvent::TouchStart { y: input.y },
        STL_INPUT_TOUCH_MOVE => InputEvent::TouchMove { y: input.y },
        STL_INPUT_TOUCH_END => InputEvent::TouchEnd,
        STL_INPUT_ENTER_BRANCH => InputEvent::EnterBranch(index),
        STL_INPUT_GO_TO_STATION => InputEvent::GoToStation(index),
        STL_INPUT_NEXT => InputEvent::Next,
        STL_INPUT_PREV => InputEvent::Prev,
        STL_INPUT_RETURN => InputEvent::Return,
        STL_INPUT_RESIZE if valid_extent(input.x) && valid_extent(input.y) => {
            InputEvent::Resize(Viewport::new(input.x, input.y))
        }
        _ => return None,
    };
    Some(event)
}

fn button_bit(button: SignButton) -> u32 {
    match button {
        SignButton::Enter => STL_BUTTON_ENTER,
        SignButton::Previous => STL_BUTTON_PREVIOUS,
        SignButton::Back => STL_BUTTON_BACK,
        SignButton::Next => STL_BUTTON_NEXT,
        SignButton::Return => STL_BUTTON_RETURN,
    }
}
