use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;
use sea_orm_migration::sea_orm::{EnumIter, Iterable};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Seq,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
struct TaskStatus;

#[derive(DeriveIden, EnumIter)]
enum TaskStatusVariants {
    Todo,
    InProgress,
    Done,
}

#[derive(DeriveIden)]
struct TaskPriority;

#[derive(DeriveIden, EnumIter)]
enum TaskPriorityVariants {
    Low,
    Medium,
    High,
}

const IDX_TASKS_CREATED_AT_SEQ: &str = "idx-tasks-created_at-seq";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(TaskStatus)
                    .values(TaskStatusVariants::iter())
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(TaskPriority)
                    .values(TaskPriorityVariants::iter())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tasks::Id))
                    .col(
                        ColumnDef::new(Tasks::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment(),
                    )
                    .col(string_len(Tasks::Title, 100))
                    .col(string_len_null(Tasks::Description, 500))
                    .col(
                        enumeration(Tasks::Status, TaskStatus, TaskStatusVariants::iter())
                            .default("todo"),
                    )
                    .col(
                        enumeration(Tasks::Priority, TaskPriority, TaskPriorityVariants::iter())
                            .default("medium"),
                    )
                    .col(timestamp_with_time_zone_null(Tasks::DueDate))
                    .col(
                        timestamp_with_time_zone(Tasks::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Tasks::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Tasks::UpdatedAt).gte(Expr::col(Tasks::CreatedAt)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_CREATED_AT_SEQ)
                    .table(Tasks::Table)
                    .col(Tasks::CreatedAt)
                    .col(Tasks::Seq)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TASKS_CREATED_AT_SEQ)
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(TaskPriority).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(TaskStatus).to_owned())
            .await
    }
}
