//! JPA entity class emitter.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::config::GenerationOptions;
use crate::error::Result;
use crate::pipeline::{EntityDescriptor, EntityKind, FieldDescriptor};
use crate::typemap::ColumnKind;

use super::sink::Sink;
use super::{Artifact, Emitter, EmitterFactory};

const INDENT: &str = "    ";

/// Annotation marking String fields for the generated project's encryption
/// hook. The project supplies the annotation type at this name.
pub const ENCRYPTED_ANNOTATION: &str = "org.schemagen.annotations.Encrypted";

/// Renders one entity as a Java class and writes it to a sink.
#[derive(Debug)]
pub struct EntityEmitter<S: Sink> {
    sink: S,
}

impl<S: Sink> EntityEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Relative path of the class file: package directories plus
    /// `<Class>.java`.
    pub fn artifact_path(entity: &EntityDescriptor) -> PathBuf {
        let mut path: PathBuf = entity
            .package_name
            .split('.')
            .filter(|s| !s.is_empty())
            .collect();
        path.push(format!("{}.java", entity.class_name));
        path
    }

    /// Render the class source.
    pub fn render(entity: &EntityDescriptor, options: &GenerationOptions) -> String {
        let mut out = String::new();

        out.push_str(&format!("package {};\n\n", entity.package_name));
        for import in imports(entity, options) {
            out.push_str(&format!("import {};\n", import));
        }
        out.push('\n');

        out.push_str(&format!(
            "/**\n * Entity for {} [{}] in database [{}].\n */\n",
            match entity.kind {
                EntityKind::Table => "table",
                EntityKind::View => "view",
            },
            entity.source_name,
            entity.database
        ));
        if options.dependency_injection_annotations {
            out.push_str("@Named\n");
        }
        out.push_str("@Entity\n");
        if entity.kind == EntityKind::View {
            out.push_str("@Immutable\n");
        }
        out.push_str(&format!(
            "@Table(name = \"{}\")\n",
            java_string(&entity.source_name)
        ));
        out.push_str(&format!("public class {}", entity.class_name));
        if options.enterprise_container_annotations {
            out.push_str(" implements Serializable");
        }
        out.push_str(" {\n");

        if options.enterprise_container_annotations {
            out.push_str(&format!(
                "{INDENT}private static final long serialVersionUID = 1L;\n\n"
            ));
        }
        if options.event_bus_integration {
            out.push_str(&format!("{INDENT}@Transient\n{INDENT}private Bus bus;\n\n"));
        }

        for field in &entity.fields {
            render_field(&mut out, field, options);
        }

        if options.event_bus_integration {
            out.push_str(&format!(
                "{INDENT}public void setBus(Bus bus) {{\n{INDENT}{INDENT}this.bus = bus;\n{INDENT}}}\n\n"
            ));
        }

        for field in &entity.fields {
            render_getter(&mut out, field, options);
            if entity.kind == EntityKind::Table {
                render_setter(&mut out, field, options);
            }
        }

        // Drop the blank line after the last member.
        if out.ends_with("\n\n") {
            out.pop();
        }
        out.push_str("}\n");
        out
    }
}

impl<S: Sink> Emitter for EntityEmitter<S> {
    fn emit(
        &mut self,
        entity: &EntityDescriptor,
        options: &GenerationOptions,
    ) -> Result<Artifact> {
        let artifact = Artifact {
            entity: entity.source_name.clone(),
            path: Self::artifact_path(entity),
            contents: Self::render(entity, options),
        };
        debug!(
            "{}: rendered {} ({} bytes)",
            entity.source_name,
            artifact.path.display(),
            artifact.contents.len()
        );
        self.sink.write(&artifact)?;
        Ok(artifact)
    }
}

/// Creates an [`EntityEmitter`] per job, all writing to clones of one sink.
#[derive(Debug, Clone)]
pub struct EntityEmitterFactory<S: Sink + Clone> {
    sink: S,
}

impl<S: Sink + Clone> EntityEmitterFactory<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: Sink + Clone> EmitterFactory for EntityEmitterFactory<S> {
    fn create(&self, _entity_name: &str) -> Box<dyn Emitter> {
        Box::new(EntityEmitter::new(self.sink.clone()))
    }
}

fn uses_rich_date(field: &FieldDescriptor, options: &GenerationOptions) -> bool {
    options.rich_date_time_types
        && matches!(field.column_kind, ColumnKind::Date | ColumnKind::Timestamp)
}

fn java_type<'a>(field: &'a FieldDescriptor, options: &GenerationOptions) -> &'a str {
    if uses_rich_date(field, options) {
        "DateTime"
    } else {
        field.type_name
    }
}

fn is_string(field: &FieldDescriptor) -> bool {
    field.type_name == "String"
}

/// Escape text for use inside a Java string literal.
fn java_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn imports(entity: &EntityDescriptor, options: &GenerationOptions) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::from(["javax.persistence.*"]);

    if entity.kind == EntityKind::View {
        imports.insert("org.hibernate.annotations.Immutable");
    }
    if options.dependency_injection_annotations {
        imports.insert("javax.inject.Named");
    }
    if options.enterprise_container_annotations {
        imports.insert("java.io.Serializable");
    }
    if options.event_bus_integration {
        imports.insert("com.squareup.otto.Bus");
    }

    for field in &entity.fields {
        if options.nullability_annotations && !field.primitive {
            imports.insert(if field.nullable {
                "javax.annotation.Nullable"
            } else {
                "javax.annotation.Nonnull"
            });
        }
        if options.field_encryption_hooks && is_string(field) {
            imports.insert(ENCRYPTED_ANNOTATION);
        }
        if uses_rich_date(field, options) {
            imports.insert("org.joda.time.DateTime");
        } else if field.type_name == "Time" {
            imports.insert("java.sql.Time");
        }
    }

    imports
}

fn nullability(field: &FieldDescriptor, options: &GenerationOptions) -> Option<&'static str> {
    if !options.nullability_annotations || field.primitive {
        return None;
    }
    Some(if field.nullable { "@Nullable" } else { "@Nonnull" })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expression yielding a copy of `expr` for mutable types, `expr` otherwise.
fn copy_of(field: &FieldDescriptor, options: &GenerationOptions, expr: &str) -> String {
    if field.immutable || uses_rich_date(field, options) {
        return expr.to_string();
    }
    match field.column_kind {
        ColumnKind::Date | ColumnKind::Timestamp => format!(
            "{expr} != null ? new java.util.Date({expr}.getTime()) : null"
        ),
        ColumnKind::Time => format!("{expr} != null ? new Time({expr}.getTime()) : null"),
        ColumnKind::Blob => format!("{expr} != null ? {expr}.clone() : null"),
        _ => expr.to_string(),
    }
}

fn render_field(out: &mut String, field: &FieldDescriptor, options: &GenerationOptions) {
    if field.primary_key {
        out.push_str(&format!("{INDENT}@Id\n"));
    }
    if let Some(sequence) = &field.sequence {
        let sequence = java_string(sequence);
        out.push_str(&format!(
            "{INDENT}@SequenceGenerator(name = \"{sequence}\", sequenceName = \"{sequence}\", allocationSize = 1)\n"
        ));
        out.push_str(&format!(
            "{INDENT}@GeneratedValue(strategy = GenerationType.SEQUENCE, generator = \"{sequence}\")\n"
        ));
    }

    let mut column = format!("name = \"{}\"", java_string(&field.name));
    if !field.nullable {
        column.push_str(", nullable = false");
    }
    if let Some(length) = field.length {
        column.push_str(&format!(", length = {}", length));
    }
    out.push_str(&format!("{INDENT}@Column({column})\n"));

    if options.field_encryption_hooks && is_string(field) {
        out.push_str(&format!("{INDENT}@Encrypted\n"));
    }
    out.push_str(&format!(
        "{INDENT}private {} {};\n\n",
        java_type(field, options),
        field.property_name
    ));
}

fn render_getter(out: &mut String, field: &FieldDescriptor, options: &GenerationOptions) {
    let ty = java_type(field, options);
    let prefix = if ty == "boolean" { "is" } else { "get" };

    if let Some(annotation) = nullability(field, options) {
        out.push_str(&format!("{INDENT}{annotation}\n"));
    }
    out.push_str(&format!(
        "{INDENT}public {ty} {prefix}{}() {{\n",
        capitalize(&field.property_name)
    ));
    out.push_str(&format!(
        "{INDENT}{INDENT}return {};\n{INDENT}}}\n\n",
        copy_of(field, options, &field.property_name)
    ));
}

fn render_setter(out: &mut String, field: &FieldDescriptor, options: &GenerationOptions) {
    let ty = java_type(field, options);
    let name = &field.property_name;
    let param = match nullability(field, options) {
        Some(annotation) => format!("{annotation} {ty} {name}"),
        None => format!("{ty} {name}"),
    };

    out.push_str(&format!(
        "{INDENT}public void set{}({param}) {{\n",
        capitalize(name)
    ));
    out.push_str(&format!(
        "{INDENT}{INDENT}this.{name} = {};\n",
        copy_of(field, options, name)
    ));
    if options.event_bus_integration {
        out.push_str(&format!(
            "{INDENT}{INDENT}if (bus != null) {{\n{INDENT}{INDENT}{INDENT}bus.post(this);\n{INDENT}{INDENT}}}\n"
        ));
    }
    out.push_str(&format!("{INDENT}}}\n\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Column;
    use crate::emitter::MemorySink;

    fn field(name: &str, kind: ColumnKind, nullable: bool) -> FieldDescriptor {
        FieldDescriptor::resolve(&Column::new(name, kind, nullable)).unwrap()
    }

    fn person(kind: EntityKind) -> EntityDescriptor {
        let mut id = field("id", ColumnKind::Integer, false);
        id.primary_key = true;
        id.sequence = Some("person_seq".into());

        EntityDescriptor {
            source_name: "person".into(),
            kind,
            database: "shop".into(),
            class_name: "Person".into(),
            package_name: "com.example.shop".into(),
            fields: vec![
                id,
                field("name", ColumnKind::Varchar, true),
                field("age", ColumnKind::SmallInt, true),
                field("active", ColumnKind::Bit, false),
                field("created_at", ColumnKind::Timestamp, false),
            ],
            sequences: vec!["person_seq".into()],
        }
    }

    type Render = EntityEmitter<MemorySink>;

    #[test]
    fn test_render_table_defaults() {
        let source = Render::render(&person(EntityKind::Table), &GenerationOptions::default());

        assert!(source.starts_with("package com.example.shop;\n\nimport javax.persistence.*;\n"));
        assert!(source.contains("@Entity\n@Table(name = \"person\")\npublic class Person {"));
        assert!(source.contains("    @Id\n"));
        assert!(source.contains("generator = \"person_seq\""));
        assert!(source.contains("@Column(name = \"id\", nullable = false)\n    private int id;"));
        assert!(source.contains("private String name;"));
        assert!(source.contains("private Integer age;"));
        assert!(source.contains("public boolean isActive()"));
        assert!(source.contains("public Integer getAge()"));
        assert!(source.contains("public void setAge(Integer age)"));
        assert!(source.contains("private java.util.Date createdAt;"));
        assert!(source.contains("return createdAt != null ? new java.util.Date(createdAt.getTime()) : null;"));
        assert!(!source.contains("@Nullable"));
        assert!(!source.contains("@Immutable"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn test_render_view_is_read_only() {
        let source = Render::render(&person(EntityKind::View), &GenerationOptions::default());

        assert!(source.contains("import org.hibernate.annotations.Immutable;"));
        assert!(source.contains("@Entity\n@Immutable\n@Table(name = \"person\")"));
        assert!(source.contains("public Integer getAge()"));
        assert!(!source.contains("public void set"));
    }

    #[test]
    fn test_render_nullability_annotations() {
        let options = GenerationOptions {
            nullability_annotations: true,
            ..Default::default()
        };
        let source = Render::render(&person(EntityKind::Table), &options);

        assert!(source.contains("import javax.annotation.Nullable;"));
        assert!(source.contains("import javax.annotation.Nonnull;"));
        assert!(source.contains("    @Nullable\n    public String getName()"));
        assert!(source.contains("public void setName(@Nullable String name)"));
        assert!(source.contains("    @Nonnull\n    public java.util.Date getCreatedAt()"));
        // primitives never carry nullability annotations
        assert!(source.contains("    public int getId()"));
        assert!(!source.contains("@Nonnull\n    public int getId()"));
    }

    #[test]
    fn test_render_toggles() {
        let options = GenerationOptions {
            dependency_injection_annotations: true,
            field_encryption_hooks: true,
            rich_date_time_types: true,
            enterprise_container_annotations: true,
            event_bus_integration: true,
            ..Default::default()
        };
        let source = Render::render(&person(EntityKind::Table), &options);

        assert!(source.contains("@Named\n@Entity"));
        assert!(source.contains("@Encrypted\n    private String name;"));
        assert!(source.contains(&format!("import {};", ENCRYPTED_ANNOTATION)));
        assert!(!source.contains("@Encrypted\n    private Integer age;"));
        assert!(source.contains("import org.joda.time.DateTime;"));
        assert!(source.contains("private DateTime createdAt;"));
        assert!(source.contains("return createdAt;"));
        assert!(source.contains("public class Person implements Serializable {"));
        assert!(source.contains("serialVersionUID"));
        assert!(source.contains("import com.squareup.otto.Bus;"));
        assert!(source.contains("bus.post(this);"));
    }

    #[test]
    fn test_encryption_import_only_with_string_fields() {
        let options = GenerationOptions {
            field_encryption_hooks: true,
            ..Default::default()
        };
        let mut entity = person(EntityKind::Table);
        entity.fields = vec![field("age", ColumnKind::SmallInt, true)];
        let source = Render::render(&entity, &options);

        assert!(!source.contains("@Encrypted"));
        assert!(!source.contains(ENCRYPTED_ANNOTATION));
    }

    #[test]
    fn test_quoted_names_are_escaped() {
        let mut entity = person(EntityKind::Table);
        entity.source_name = "odd\"table".into();
        let mut odd = field("path", ColumnKind::Varchar, true);
        odd.name = "c:\\dir".into();
        entity.fields = vec![odd];
        let source = Render::render(&entity, &GenerationOptions::default());

        assert!(source.contains(r#"@Table(name = "odd\"table")"#));
        assert!(source.contains(r#"@Column(name = "c:\\dir")"#));
    }

    #[test]
    fn test_blob_getter_copies() {
        let mut entity = person(EntityKind::Table);
        entity.fields = vec![field("photo", ColumnKind::Blob, true)];
        let source = Render::render(&entity, &GenerationOptions::default());

        assert!(source.contains("private Byte[] photo;"));
        assert!(source.contains("return photo != null ? photo.clone() : null;"));
    }

    #[test]
    fn test_emit_writes_to_sink() {
        let sink = MemorySink::new();
        let factory = EntityEmitterFactory::new(sink.clone());
        let mut emitter = factory.create("person");

        let artifact = emitter
            .emit(&person(EntityKind::Table), &GenerationOptions::default())
            .unwrap();
        assert_eq!(artifact.path, PathBuf::from("com/example/shop/Person.java"));
        assert_eq!(sink.artifacts(), vec![artifact]);
    }
}
