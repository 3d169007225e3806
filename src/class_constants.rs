//! Literal constants of the class file format, as far as attributes care.

/// The attribute names this crate recognizes.
///
/// See [JVMS, table 4.7-A](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7).
pub(crate) mod attribute {
	pub(crate) const CODE: &str = "Code";
	pub(crate) const INNER_CLASSES: &str = "InnerClasses";
	pub(crate) const CONSTANT_VALUE: &str = "ConstantValue";
	pub(crate) const SIGNATURE: &str = "Signature";
	pub(crate) const ANNOTATION_DEFAULT: &str = "AnnotationDefault";
	pub(crate) const EXCEPTIONS: &str = "Exceptions";
	pub(crate) const ENCLOSING_METHOD: &str = "EnclosingMethod";
	pub(crate) const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
	pub(crate) const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
	pub(crate) const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";
	pub(crate) const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeInvisibleParameterAnnotations";
	pub(crate) const RUNTIME_VISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeVisibleTypeAnnotations";
	pub(crate) const RUNTIME_INVISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeInvisibleTypeAnnotations";
	pub(crate) const LOCAL_VARIABLE_TABLE: &str = "LocalVariableTable";
	pub(crate) const LOCAL_VARIABLE_TYPE_TABLE: &str = "LocalVariableTypeTable";
	pub(crate) const BOOTSTRAP_METHODS: &str = "BootstrapMethods";
	pub(crate) const SYNTHETIC: &str = "Synthetic";
	pub(crate) const DEPRECATED: &str = "Deprecated";
	pub(crate) const LINE_NUMBER_TABLE: &str = "LineNumberTable";
	pub(crate) const METHOD_PARAMETERS: &str = "MethodParameters";
	pub(crate) const MODULE: &str = "Module";
	pub(crate) const RECORD: &str = "Record";
	pub(crate) const PERMITTED_SUBCLASSES: &str = "PermittedSubclasses";
	pub(crate) const SOURCE_FILE: &str = "SourceFile";
}

/// The `target_type` bytes of the `type_annotation` structure.
///
/// See [JVMS, tables 4.7.20-A to 4.7.20-C](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.20).
pub(crate) mod type_annotation {
	pub(crate) const CLASS_TYPE_PARAMETER: u8 = 0x00;
	pub(crate) const METHOD_TYPE_PARAMETER: u8 = 0x01;
	pub(crate) const CLASS_EXTENDS: u8 = 0x10;
	pub(crate) const CLASS_TYPE_PARAMETER_BOUND: u8 = 0x11;
	pub(crate) const METHOD_TYPE_PARAMETER_BOUND: u8 = 0x12;
	pub(crate) const FIELD: u8 = 0x13;
	pub(crate) const METHOD_RETURN: u8 = 0x14;
	pub(crate) const METHOD_RECEIVER: u8 = 0x15;
	pub(crate) const METHOD_FORMAL_PARAMETER: u8 = 0x16;
	pub(crate) const THROWS: u8 = 0x17;
	pub(crate) const LOCAL_VARIABLE: u8 = 0x40;
	pub(crate) const RESOURCE_VARIABLE: u8 = 0x41;
	pub(crate) const EXCEPTION_PARAMETER: u8 = 0x42;
	pub(crate) const INSTANCE_OF: u8 = 0x43;
	pub(crate) const NEW: u8 = 0x44;
	pub(crate) const CONSTRUCTOR_REFERENCE: u8 = 0x45;
	pub(crate) const METHOD_REFERENCE: u8 = 0x46;
	pub(crate) const CAST: u8 = 0x47;
	pub(crate) const CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT: u8 = 0x48;
	pub(crate) const METHOD_INVOCATION_TYPE_ARGUMENT: u8 = 0x49;
	pub(crate) const CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT: u8 = 0x4A;
	pub(crate) const METHOD_REFERENCE_TYPE_ARGUMENT: u8 = 0x4B;
}
