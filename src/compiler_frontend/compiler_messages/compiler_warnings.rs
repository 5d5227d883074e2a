use saying::say;

#[derive(Clone, Debug, PartialEq)]
pub struct CompilerWarning {
    pub msg: String,
    pub warning_kind: WarningKind,
}

impl CompilerWarning {
    pub fn new(msg: &str, warning_kind: WarningKind) -> CompilerWarning {
        CompilerWarning {
            msg: msg.to_owned(),
            warning_kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarningKind {
    // The program declares functions but none of them is the entry point,
    // so the simulator has nowhere to start
    MissingEntryPoint,

    // 'return <expr>' inside a function declared void
    ReturnValueInVoidFunction,
}

pub fn print_formatted_warning(w: CompilerWarning) {
    say!(Yellow Bold "WARNING: ");
    match w.warning_kind {
        WarningKind::MissingEntryPoint => {
            say!("No entry point function '", w.msg, "' was declared");
        }
        WarningKind::ReturnValueInVoidFunction => {
            say!("Function '", w.msg, "' is declared void but returns a value");
        }
    }
}
