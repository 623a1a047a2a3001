// Ready-made Toolview Components
//
// Component definitions a host can register as-is:
// - ui.displaySimpleText: plain text block
// - ui.displayKeyValuePairs: structured attributes with mixed content streams
// - weather.getCurrentWeather / weather.getSevenDayForecast: weather cards
//   wired together through redirect actions
// - todo.*: a todo list family sharing one store, with redirect actions for
//   every mutation and a local exportJson action

pub mod key_value;
pub mod simple_text;
pub mod todo;
pub mod weather;

pub use key_value::key_value_pairs_display;
pub use simple_text::simple_text_display;
pub use todo::{todo_components, Todo, TodoFilter, TodoStore};
pub use weather::{current_weather, seven_day_forecast};

use toolview_core::{ComponentRegistry, Result};

/// Register every ready-made component into a registry.
///
/// Returns the todo store backing the todo.* family so the host (or a test)
/// can seed and inspect it.
pub fn register_defaults(registry: &ComponentRegistry) -> Result<TodoStore> {
    registry.register(simple_text_display()?)?;
    registry.register(key_value_pairs_display()?)?;
    registry.register(current_weather()?)?;
    registry.register(seven_day_forecast()?)?;

    let store = TodoStore::new();
    for definition in todo_components(&store)? {
        registry.register(definition)?;
    }
    Ok(store)
}
