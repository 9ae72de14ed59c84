// Template renderer
//
// Three bundled Handlebars templates turn a GenerationModel into the text of
// the stub artifacts. Rendering is pure: nothing here touches the filesystem.

use std::io;

use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;

use super::error::StubError;
use super::sanitize::{indent, sanitise_variable_name, to_snake_case, wrap_text};
use crate::registry::{
	AlgorithmDescriptor, GenerationModel, Identifier, MetadataFieldDescriptor, ReturnKind,
	WindowTypeDescriptor,
};

const METADATA_FIELDS: &str = "metadata_fields";
const WINDOW_TYPES: &str = "window_types";
const ALGORITHMS: &str = "algorithms";

const TEMPLATES: [(&str, &str); 3] = [
	(METADATA_FIELDS, include_str!("../../templates/metadata_fields.pyi.hbs")),
	(WINDOW_TYPES, include_str!("../../templates/window_types.pyi.hbs")),
	(ALGORITHMS, include_str!("../../templates/algorithms.pyi.hbs")),
];

handlebars_helper!(snake_case_helper: |s: str| to_snake_case(s));
handlebars_helper!(sanitise_helper: |s: str| sanitise_variable_name(s));
handlebars_helper!(wrap_helper: |limit: u64, s: str| wrap_text(limit as usize, s));
handlebars_helper!(indent_helper: |spaces: u64, s: str| indent(spaces as usize, s));

/// Rendered text of every generated artifact, held in memory until written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedStubs {
	pub metadata_fields: String,
	pub window_types: String,
	pub algorithms: String,
}

/// Renders a GenerationModel with the bundled templates
pub struct StubRenderer {
	handlebars: Handlebars<'static>,
}

impl StubRenderer {
	pub fn new() -> Result<Self, StubError> {
		let mut handlebars = Handlebars::new();
		handlebars.set_strict_mode(true);
		// Output is Python, not HTML
		handlebars.register_escape_fn(handlebars::no_escape);

		handlebars.register_helper("snake_case", Box::new(snake_case_helper));
		handlebars.register_helper("sanitise", Box::new(sanitise_helper));
		handlebars.register_helper("wrap", Box::new(wrap_helper));
		handlebars.register_helper("indent", Box::new(indent_helper));

		for (name, source) in TEMPLATES {
			handlebars
				.register_template_string(name, source)
				.map_err(|e| StubError::Template {
					name,
					source: Box::new(e),
				})?;
		}

		Ok(Self { handlebars })
	}

	/// Render all three artifacts
	pub fn render(&self, model: &GenerationModel) -> Result<RenderedStubs, StubError> {
		let metadata_fields = model
			.metadata_fields
			.iter()
			.map(MetadataFieldView::new)
			.collect::<Result<Vec<_>, _>>()?;
		let window_types = model
			.window_types
			.iter()
			.map(WindowTypeView::new)
			.collect::<Result<Vec<_>, _>>()?;
		let processors = model
			.processors
			.iter()
			.map(|p| {
				Ok(ProcessorView {
					name: &p.name,
					runtime: &p.runtime,
					algorithms: p
						.algorithms
						.iter()
						.map(AlgorithmView::new)
						.collect::<Result<Vec<_>, StubError>>()?,
				})
			})
			.collect::<Result<Vec<_>, StubError>>()?;

		Ok(RenderedStubs {
			metadata_fields: self.render_artifact(
				METADATA_FIELDS,
				&MetadataFieldsContext { metadata_fields },
			)?,
			window_types: self.render_artifact(WINDOW_TYPES, &WindowTypesContext { window_types })?,
			algorithms: self.render_artifact(
				ALGORITHMS,
				&AlgorithmsContext {
					imports: &model.imports,
					processors,
				},
			)?,
		})
	}

	fn render_artifact<T: Serialize>(&self, artifact: &'static str, ctx: &T) -> Result<String, StubError> {
		self
			.handlebars
			.render(artifact, ctx)
			.map_err(|e| StubError::Render {
				artifact,
				source: Box::new(e),
			})
	}
}

#[derive(Serialize)]
struct MetadataFieldsContext<'a> {
	metadata_fields: Vec<MetadataFieldView<'a>>,
}

#[derive(Serialize)]
struct WindowTypesContext<'a> {
	window_types: Vec<WindowTypeView<'a>>,
}

#[derive(Serialize)]
struct AlgorithmsContext<'a> {
	imports: &'a [ReturnKind],
	processors: Vec<ProcessorView<'a>>,
}

#[derive(Serialize)]
struct MetadataFieldView<'a> {
	name: &'a str,
	description: &'a str,
	metadata: String,
}

impl<'a> MetadataFieldView<'a> {
	fn new(field: &'a MetadataFieldDescriptor) -> Result<Self, StubError> {
		Ok(Self {
			name: &field.name,
			description: &field.description,
			metadata: metadata_comment(&FieldComment::from(field))?,
		})
	}
}

#[derive(Serialize)]
struct WindowTypeView<'a> {
	var_name: &'a str,
	name: &'a str,
	version: &'a str,
	description: &'a str,
	metadata_fields: &'a [MetadataFieldDescriptor],
	metadata: String,
}

impl<'a> WindowTypeView<'a> {
	fn new(window: &'a WindowTypeDescriptor) -> Result<Self, StubError> {
		let comment = WindowComment {
			name: &window.name,
			version: &window.version,
			description: &window.description,
			metadata_fields: window.metadata_fields.iter().map(FieldComment::from).collect(),
		};
		Ok(Self {
			var_name: &window.var_name,
			name: &window.name,
			version: &window.version,
			description: &window.description,
			metadata_fields: &window.metadata_fields,
			metadata: metadata_comment(&comment)?,
		})
	}
}

#[derive(Serialize)]
struct ProcessorView<'a> {
	name: &'a str,
	runtime: &'a str,
	algorithms: Vec<AlgorithmView<'a>>,
}

#[derive(Serialize)]
struct AlgorithmView<'a> {
	identifier: &'a Identifier,
	version: &'a str,
	description: &'a str,
	window_var_name: &'a str,
	return_kind: ReturnKind,
	metadata: String,
}

impl<'a> AlgorithmView<'a> {
	fn new(algo: &'a AlgorithmDescriptor) -> Result<Self, StubError> {
		let comment = AlgorithmComment {
			name: &algo.name,
			version: &algo.version,
			description: &algo.description,
			processor_name: &algo.processor_name,
			processor_runtime: &algo.processor_runtime,
			window_type: &algo.window_var_name,
			hash: &algo.identifier.hash,
		};
		Ok(Self {
			identifier: &algo.identifier,
			version: &algo.version,
			description: &algo.description,
			window_var_name: &algo.window_var_name,
			return_kind: algo.return_kind,
			metadata: metadata_comment(&comment)?,
		})
	}
}

// Structured `# METADATA:` payloads. Field names are part of the artifact
// format consumed by SDK tooling.

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FieldComment<'a> {
	name: &'a str,
	description: &'a str,
}

impl<'a> From<&'a MetadataFieldDescriptor> for FieldComment<'a> {
	fn from(field: &'a MetadataFieldDescriptor) -> Self {
		Self {
			name: &field.name,
			description: &field.description,
		}
	}
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WindowComment<'a> {
	name: &'a str,
	version: &'a str,
	description: &'a str,
	metadata_fields: Vec<FieldComment<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AlgorithmComment<'a> {
	name: &'a str,
	version: &'a str,
	description: &'a str,
	processor_name: &'a str,
	processor_runtime: &'a str,
	window_type: &'a str,
	hash: &'a str,
}

/// Single-line JSON with a space after every `,` and `:`
fn metadata_comment<T: Serialize>(value: &T) -> Result<String, StubError> {
	let mut buf = Vec::new();
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
	value.serialize(&mut ser)?;
	String::from_utf8(buf).map_err(|e| StubError::Metadata(serde::ser::Error::custom(e)))
}

struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
	fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
		if first { Ok(()) } else { writer.write_all(b", ") }
	}

	fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
		if first { Ok(()) } else { writer.write_all(b", ") }
	}

	fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		writer.write_all(b": ")
	}
}
