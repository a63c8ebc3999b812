/// Interception points published by the engine and the legality validator.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum GameEventKind {
    /// A move has passed validation and is about to be applied.
    MoveStart,
    /// A piece has been relocated.
    MoveEnd,
    /// Move legality check, after the shape stage.
    MoveValidate,
    /// A piece is being removed from the board by an action.
    Capture,
    /// An action has passed validation and is about to be applied.
    ActionStart,
    ActionEnd,
    /// Action legality check, after the shape stage.
    ActionValidate,
    GameOver,
    GameStart,
    TurnStart,
}
