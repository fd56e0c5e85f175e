//! SQL DDL for initializing the database schema.
//! SQLite-first design; timestamps are RFC3339 TEXT, ids are UUID strings.

/// Base schema: the five content tables plus the lesson indexes.
///
/// Everything here is `IF NOT EXISTS` so re-running is harmless. Columns that
/// shipped after the first deployments are NOT in the base DDL; they are
/// reconciled additively (see the extra-column tables below) so an existing
/// database upgrades in place without touching its rows.
pub const SQLITE_INIT: &str = r"
-- ---------------------------------------------------------------------------
-- Faculty profiles
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS faculty (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    role TEXT NULL,
    bio TEXT NULL,
    photo_url TEXT NULL,
    sort_order INTEGER NULL,
    is_published INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL  -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Blog posts (slug unique when present)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS blog_posts (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    slug TEXT NULL UNIQUE,
    excerpt TEXT NULL,
    content TEXT NULL,
    cover_image_url TEXT NULL,
    published_at TEXT NULL,
    is_published INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Partner organizations
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS partners (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    logo_url TEXT NULL,
    partner_type TEXT NOT NULL CHECK (partner_type IN ('generale', 'patrocinio', 'collaborazione')),
    description TEXT NULL,
    website_url TEXT NULL,
    sort_order INTEGER NULL,
    is_published INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Course modules (syllabus columns are reconciled additively)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS modules (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NULL,
    sort_order INTEGER NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Scheduled lessons: module/teacher references null out on delete
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS lessons (
    id TEXT PRIMARY KEY NOT NULL,
    module_id TEXT NULL REFERENCES modules(id) ON DELETE SET NULL,
    teacher_id TEXT NULL REFERENCES faculty(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    description TEXT NULL,
    start_datetime TEXT NOT NULL,
    end_datetime TEXT NULL,
    duration_minutes INTEGER NULL DEFAULT 120,
    location_physical TEXT NULL,
    location_remote TEXT NULL,
    status TEXT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'confirmed', 'completed', 'cancelled')),
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lessons_start ON lessons(start_datetime);

CREATE INDEX IF NOT EXISTS idx_lessons_module ON lessons(module_id);

CREATE INDEX IF NOT EXISTS idx_lessons_teacher ON lessons(teacher_id)
";

/// Columns added to `faculty` after the table first shipped.
pub const FACULTY_EXTRA_COLUMNS: &[(&str, &str)] = &[("profile_link", "TEXT")];

/// Syllabus extension columns added to `modules` after the table first shipped.
pub const MODULE_EXTRA_COLUMNS: &[(&str, &str)] = &[
    ("cfu", "INTEGER"),
    ("ssd", "TEXT"),
    ("period", "TEXT"),
    ("hours_lectures", "INTEGER DEFAULT 0"),
    ("hours_lab", "INTEGER DEFAULT 0"),
    ("hours_study", "INTEGER DEFAULT 0"),
    ("description_short", "TEXT"),
    ("contents_main", "TEXT"),
    ("contents_detailed", "TEXT"),
    ("learning_objectives", "TEXT"),
    ("evaluation", "TEXT"),
    ("bibliography", "TEXT"),
    ("schedule_info", "TEXT"),
];
