//! Log targets for the [`tracing`] crate, used as `target:` in macros like [`tracing::trace`]

macro_rules! tracing_targets {
	{$( $name:ident = $val:expr ),* $(,)?} => {
		$( pub const $name: &str = concat!(env!("CARGO_PKG_NAME"), "::", $val); )*
	};
}

tracing_targets! {
	MAIN = "main",
	PICK = "pick",
	SCENE = "scene",
	OBJ = "obj",
}
