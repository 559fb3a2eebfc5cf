//! Todo list shared by decoupled consumers through a global store

use flexstore::{Action, ActionTypes, Reducer, Selector, Store, StoreError, Value};

struct Types {
    add: String,
    toggle: String,
    set_filter: String,
}

impl Types {
    fn claim(types: &mut ActionTypes) -> Result<Self, StoreError> {
        Ok(Self {
            add: types.unique("ADD_TODO")?,
            toggle: types.unique("TOGGLE_TODO")?,
            set_filter: types.unique("SET_FILTER")?,
        })
    }
}

fn todo_reducer(types: &Types) -> Reducer {
    let add = types.add.clone();
    let toggle = types.toggle.clone();
    let set_filter = types.set_filter.clone();

    Reducer::new(move |state, action| {
        let payload = action.payload().cloned().unwrap_or_default();
        let todos = state.get("todos").cloned().unwrap_or_else(Value::map);

        if action.is(&add) {
            let id = payload.get("id").and_then(Value::as_i64).unwrap_or_default();
            let content = payload.get("content").cloned().unwrap_or_default();
            let todo = Value::map().with("content", content).with("completed", false);
            state.with("todos", todos.with(id.to_string(), todo))
        } else if action.is(&toggle) {
            let id = payload.get("id").and_then(Value::as_i64).unwrap_or_default().to_string();
            match todos.get(&id) {
                Some(todo) => {
                    let done = todo.get("completed").and_then(Value::as_bool).unwrap_or(false);
                    state.with("todos", todos.with(id.clone(), todo.with("completed", !done)))
                }
                None => state.clone(),
            }
        } else if action.is(&set_filter) {
            state.with("filter", payload.get("filter").cloned().unwrap_or_default())
        } else {
            state.clone()
        }
    })
}

fn print_todos(state: &Value) {
    let filter = state.get("filter").and_then(Value::as_str).unwrap_or("all");
    let Some(todos) = state.get("todos").and_then(Value::as_map) else {
        return;
    };
    for (id, todo) in todos {
        let completed = todo.get("completed").and_then(Value::as_bool).unwrap_or(false);
        let visible = match filter {
            "active" => !completed,
            "completed" => completed,
            _ => true,
        };
        if visible {
            let status = if completed { "✓" } else { " " };
            let content = todo.get("content").and_then(Value::as_str).unwrap_or_default();
            println!("   [{}] {}. {}", status, id, content);
        }
    }
}

fn main() -> Result<(), StoreError> {
    println!("=== Flexstore Example: Todo App ===\n");

    let store = Store::global();
    let types = Types::claim(&mut ActionTypes::new())?;
    let initial = Value::map().with("todos", Value::map()).with("filter", "all");

    // The app owns the reducer; header and filter bar only read through selectors.
    println!("1. Mounting the app");
    let app = store.register_reducer(
        "app",
        todo_reducer(&types),
        initial.clone(),
        store.options().notify(|state| {
            println!("   [App] {} todo(s)", state.get("todos").map(Value::len).unwrap_or(0));
        }),
    )?;
    let _header = store.register_selector(
        Selector::new(|state| Value::from(state.path(&["app", "todos"]).map(Value::len).unwrap_or(0) as i64)),
        |count| println!("   [Header] Todo List ({count})"),
    );
    let _filters = store.register_selector(Selector::path(["app", "filter"]), |filter| {
        println!("   [Filters] active filter: {filter}")
    });

    println!("\n2. Adding todos");
    for (id, content) in [(1, "Learn Rust"), (2, "Build a store"), (3, "Write docs")] {
        store.dispatch(Action::with_payload(
            &types.add,
            Value::map().with("id", id).with("content", content),
        ))?;
    }

    println!("\n3. Completing the first todo (header stays quiet)");
    store.dispatch(Action::with_payload(&types.toggle, Value::map().with("id", 1)))?;

    println!("\n4. Showing only active todos");
    store.dispatch(Action::with_payload(
        &types.set_filter,
        Value::map().with("filter", "active"),
    ))?;
    print_todos(&store.state().get("app").cloned().unwrap_or_default());

    println!("\n5. Unmounting and remounting the app (state resumes from cache)");
    app.unregister();
    let app = store.register_reducer("app", todo_reducer(&types), initial, store.options())?;
    print_todos(&app.state().unwrap_or_default());

    println!("\n6. Malformed actions are rejected");
    if let Err(err) = store.dispatch(Action::new("")) {
        println!("   {err}");
    }

    println!("\n✓ Example complete!");
    Ok(())
}
