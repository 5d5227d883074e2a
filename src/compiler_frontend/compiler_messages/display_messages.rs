use crate::compiler_frontend::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType, error_type_to_str,
};
use crate::compiler_frontend::compiler_warnings::print_formatted_warning;
use saying::say;

pub fn print_compiler_messages(messages: CompilerMessages) {
    // Format and print out the messages:
    for err in messages.errors {
        print_formatted_error(err);
    }

    for warning in messages.warnings {
        print_formatted_warning(warning);
    }
}

pub fn print_formatted_error(e: CompilerError) {
    let heading = error_type_to_str(&e.error_type);

    match e.error_type {
        ErrorType::Redeclaration => {
            say!("\n(╯°□°)╯  🔥🔥 ", Red heading, " 🔥🔥  Σ(°△°;) ");
        }

        ErrorType::UndeclaredReference => {
            say!("\n(ಠ_ಠ) ", Red heading);
        }

        ErrorType::UnsupportedArity => {
            say!("\nヽ(˶°o°)ﾉ  🔥 ", Red heading, " 🔥  ╰(°□°╰) ");
        }

        ErrorType::Rule => {
            say!("\nヽ(˶°o°)ﾉ  🔥🔥🔥 ", Red heading, " 🔥🔥🔥  ╰(°□°╰) ");
        }

        ErrorType::File => {
            say!(Yellow "🏚 Can't read or write file: ");
            if let Some(path) = e.variable_name() {
                say!(Dark Magenta path);
            }
            say!(e.msg);
            return;
        }

        ErrorType::Input => {
            say!("\n (-_-)  🔥🔥 ", Red heading, " 🔥🔥  <(^~^)/ ");
            say!(Dark Yellow "The program tree handed to the compiler could not be read");
        }

        ErrorType::Config => {
            say!("\n (-_-)  🔥🔥🔥🔥 ", Red heading, " 🔥🔥🔥🔥  <(^~^)/ ");
            say!(Dark Yellow "Malformed config file, something doesn't make sense inside it");
        }

        ErrorType::Compiler => {
            say!("\nヽ༼☉ ‿ ⚆༽ﾉ  🔥🔥🔥🔥 ", Red heading, " 🔥🔥🔥🔥  ╰(° _ o╰) ");
            say!(Dark Yellow "compiler developer skill issue (not your fault)");
        }
    }

    if let Some(name) = e.variable_name() {
        say!(Dark Magenta "Name: ", Bright name);
    }

    if let Some(stage) = e.metadata.get(&ErrorMetaDataKey::CompilationStage) {
        say!(Bright Black "During: ", stage);
    }

    say!(Red e.msg);

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green "Suggestion: ", suggestion);
    }
}
