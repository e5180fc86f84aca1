//! WASM bindings for gog-core
//!
//! Exposes a [`Game`] to a browser front end. Ranks and directions are
//! passed as strings ("SPY", "2LT", "up"); structured results go back
//! through `serde-wasm-bindgen`. Errors become JS exceptions carrying the
//! error message.

use wasm_bindgen::prelude::*;

use crate::{Direction, Game, Rank, Side};

fn js_err<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_err)
}

fn parse_side(side: &str) -> Result<Side, JsValue> {
    match side.trim().to_ascii_lowercase().as_str() {
        "player" => Ok(Side::Player),
        "opponent" => Ok(Side::Opponent),
        _ => Err(JsValue::from_str(&format!("unknown side '{side}'"))),
    }
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new match in the setup phase
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Create a reproducible match
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> WasmGame {
        WasmGame { inner: Game::with_seed(seed) }
    }

    /// Current phase as a tagged object, e.g. `"PlayerTurn"` or
    /// `{ Finished: { winner, reason } }`
    pub fn phase(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.phase())
    }

    /// Remaining pieces as `[[rank, count], ...]`
    pub fn remaining(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.remaining())
    }

    /// Place a piece during setup. Returns the "A1" style position.
    #[wasm_bindgen(js_name = placePiece)]
    pub fn place_piece(&mut self, rank: &str, x: u8, y: u8) -> Result<String, JsValue> {
        let rank: Rank = rank.parse().map_err(js_err)?;
        let pos = self.inner.place_piece(rank, x, y).map_err(js_err)?;
        Ok(pos.to_string())
    }

    /// Undo the last placement. Returns the rank keyword of the piece.
    #[wasm_bindgen(js_name = undoLastPlacement)]
    pub fn undo_last_placement(&mut self) -> Result<String, JsValue> {
        let piece = self.inner.undo_last_placement().map_err(js_err)?;
        Ok(piece.rank().keyword().to_string())
    }

    /// Randomize "player" or "opponent"
    pub fn randomize(&mut self, side: &str) -> Result<(), JsValue> {
        let side = parse_side(side)?;
        self.inner.randomize(side).map_err(js_err)
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.inner.start().map_err(js_err)
    }

    /// Move the human's piece. Returns the outcome object.
    #[wasm_bindgen(js_name = executeMove)]
    pub fn execute_move(&mut self, x: u8, y: u8, direction: &str) -> Result<JsValue, JsValue> {
        let dir: Direction = direction.parse().map_err(js_err)?;
        let outcome = self.inner.execute_move(x, y, dir).map_err(js_err)?;
        to_js(&outcome)
    }

    /// Let the opponent move. Returns `{ from, direction, outcome }`.
    #[wasm_bindgen(js_name = opponentTakeTurn)]
    pub fn opponent_take_turn(&mut self) -> Result<JsValue, JsValue> {
        let mv = self.inner.opponent_take_turn().map_err(js_err)?;
        to_js(&mv)
    }

    #[wasm_bindgen(js_name = acknowledgeChallenge)]
    pub fn acknowledge_challenge(&mut self) -> Result<(), JsValue> {
        self.inner.acknowledge_challenge().map_err(js_err)
    }

    /// What the human sees on one cell
    #[wasm_bindgen(js_name = queryPiece)]
    pub fn query_piece(&self, x: u8, y: u8) -> Result<JsValue, JsValue> {
        let view = self.inner.query_piece(x, y).map_err(js_err)?;
        to_js(&view)
    }

    /// Display symbols for all 72 cells, row-major from A1
    pub fn symbols(&self) -> Vec<String> {
        self.inner.view().iter().map(|view| view.symbol().to_string()).collect()
    }

    /// Last piece lost in combat as `{ rank, side, ... }`, or null
    #[wasm_bindgen(js_name = lastCaptured)]
    pub fn last_captured(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.board().last_captured())
    }

    pub fn forfeit(&mut self) -> Result<(), JsValue> {
        self.inner.forfeit().map_err(js_err)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Plain-text board dump
    #[wasm_bindgen(js_name = toString)]
    pub fn to_text(&self) -> String {
        self.inner.board().to_string()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
