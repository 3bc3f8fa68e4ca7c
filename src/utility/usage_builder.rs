
use nonempty::NonEmpty;

use crate::commands::arguments::Argument;


pub struct UsageBuilder {
    command_names: NonEmpty<String>,
    parent: Option<String>,
    help: String,
    examples: Vec<String>,
}

impl UsageBuilder {

    pub fn new(command_names: NonEmpty<String>) -> UsageBuilder {
        UsageBuilder {
            command_names,
            parent: None,
            help: String::new(),
            examples: Vec::new(),
        }
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    pub fn triggers(&self) -> &NonEmpty<String> {
        &self.command_names
    }

    pub fn get_parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Full command path, e.g. `mute list`.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} {}", parent, self.command_names.head),
            None => self.command_names.head.clone()
        }
    }

    fn build_arguments(arguments: &[Argument], separator: Option<&str>) -> String {
        let mut usage_string = String::new();
        for (i, argument) in arguments.iter().enumerate() {
            let separated = i > 0 && separator.is_some();
            let name = match (separated, separator) {
                (true, Some(separator)) => format!("{} <{}>", separator, argument.name),
                _ => argument.name.to_string(),
            };
            match (argument.required, separated) {
                (true, false) => usage_string.push_str(&format!(" <{}>", name)),
                (true, true)  => usage_string.push_str(&format!(" {}", name)),
                (false, _)    => usage_string.push_str(&format!(" [{}]", name)),
            }
        }
        usage_string
    }

    pub fn build(&self, prefix: &str, arguments: &[Argument], separator: Option<&str>) -> String {

        // build usage string
        let mut usage_string = format!("`{}{}{}`",
            prefix,
            self.path(),
            UsageBuilder::build_arguments(arguments, separator));

        if !self.help.is_empty() {
            usage_string.push_str(&format!(" - {}", self.help));
        }

        // add alternative command names
        if !self.command_names.tail.is_empty() {
            usage_string.push_str(&format!("\nAlternative names: {}", self.command_names.tail.join(", ")));
        }

        for example in self.examples.iter() {
            usage_string.push_str(&format!("\nExample: `{}{}`", prefix, example));
        }

        usage_string

    }

}
